//! Line-oriented chat loop over an [`AgentRuntime`].

use anyhow::Result;
use sitecore_graph::AgentRuntime;
use std::future::Future;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

pub const BANNER: &str = "Sitecore Agent (type 'exit' to quit)";
pub const PROMPT: &str = "\n> ";

#[derive(Debug, PartialEq, Eq)]
pub enum Command<'a> {
    Exit,
    Ask(&'a str),
}

/// `exit`/`quit` end the session; every other line, blank included, is a turn.
pub fn parse_line(line: &str) -> Command<'_> {
    let line = line.trim();
    if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
        Command::Exit
    } else {
        Command::Ask(line)
    }
}

/// Run turns until `exit`/`quit`, end of input, or Ctrl-C.
pub async fn run<R, W, A>(input: R, output: W, agent: &A) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
    A: AgentRuntime + ?Sized,
{
    run_until(input, output, agent, tokio::signal::ctrl_c()).await
}

/// Same loop, ended when `interrupt` resolves, whether the session is
/// waiting for input or in the middle of a turn. A failed turn is printed
/// and the loop continues.
pub async fn run_until<R, W, A, I>(input: R, mut output: W, agent: &A, interrupt: I) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
    A: AgentRuntime + ?Sized,
    I: Future,
{
    // One listener for the whole session, so no interrupt falls between turns
    tokio::pin!(interrupt);

    output.write_all(format!("{BANNER}\n").as_bytes()).await?;
    let mut lines = input.lines();

    loop {
        output.write_all(PROMPT.as_bytes()).await?;
        output.flush().await?;

        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = &mut interrupt => {
                tracing::debug!("REPL: interrupted while waiting for input");
                None
            }
        };

        let Some(line) = line else {
            output.write_all(b"\n").await?;
            break;
        };

        let text = match parse_line(&line) {
            Command::Exit => break,
            Command::Ask(text) => text,
        };

        let outcome = tokio::select! {
            outcome = agent.run(text) => outcome,
            _ = &mut interrupt => {
                tracing::debug!("REPL: interrupted during a turn");
                output.write_all(b"\n").await?;
                break;
            }
        };

        let reply = match outcome {
            Ok(response) => response.text,
            Err(e) => {
                tracing::error!("REPL: turn failed: {:#}", e);
                format!("Error: {:#}", e)
            }
        };
        output.write_all(format!("{reply}\n").as_bytes()).await?;
    }

    output.flush().await?;
    Ok(())
}
