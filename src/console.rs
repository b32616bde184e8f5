//! Console channel — reads queries from stdin, streams replies to stdout.
//!
//! One session per process: each turn renders the transcript, runs the
//! configured chain, prints chunks as they arrive, and appends both turns
//! to the transcript. Chain errors are reported on the console and the
//! loop continues with the next turn. Runs until the `shutdown` token is
//! cancelled (Ctrl-C) or stdin is closed.

use std::io::Write as _;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;
use tracing::{debug, info, warn};

use crate::chain::{SearchChain, TurnInput};
use crate::error::AppError;
use crate::session::Transcript;

pub async fn run(
    chain: SearchChain,
    mut transcript: Transcript,
    shutdown: CancellationToken,
    bot_name: &str,
) -> Result<(), AppError> {
    let session_id = Uuid::new_v4();
    info!(%session_id, "console channel started — type a question and press Enter. Ctrl-C to quit.");
    println!("─────────────────────────────────");
    println!(" {bot_name} console  (Ctrl-C to quit)");
    println!("─────────────────────────────────");

    let stdin = tokio::io::stdin();
    let mut lines = BufReader::new(stdin).lines();

    loop {
        print!("> ");
        let _ = std::io::stdout().flush();

        tokio::select! {
            biased;

            _ = shutdown.cancelled() => {
                println!("\n[console] shutdown signal received — closing session");
                info!(%session_id, turns = transcript.len(), "console channel shutting down");
                break;
            }

            line = lines.next_line() => {
                match line {
                    Err(e) => {
                        warn!("console read error: {e}");
                        break;
                    }
                    Ok(None) => {
                        info!("stdin closed");
                        break;
                    }
                    Ok(Some(input)) => {
                        let input = input.trim().to_string();
                        if input.is_empty() { continue; }

                        debug!(query = %input, "console received query");
                        run_turn(&chain, &mut transcript, &input).await;
                    }
                }
            }
        }
    }

    Ok(())
}

/// One user turn: stream the reply to stdout and record both sides.
async fn run_turn(chain: &SearchChain, transcript: &mut Transcript, input: &str) {
    let history = transcript.render();
    let turn = TurnInput { user_query: input, chat_history: &history };

    let mut stream = match chain.respond(turn).await {
        Ok(stream) => stream,
        Err(e) => {
            println!("[error] {e}");
            warn!(error = %e, "turn failed before streaming");
            return;
        }
    };

    transcript.push_human(input);

    let mut reply = String::new();
    while let Some(item) = stream.next().await {
        match item {
            Ok(chunk) => {
                print!("{chunk}");
                let _ = std::io::stdout().flush();
                reply.push_str(&chunk);
            }
            Err(e) => {
                println!("\n[error] {e}");
                warn!(error = %e, "stream interrupted");
                break;
            }
        }
    }
    println!();

    // A partially-streamed reply is still context the user saw.
    if !reply.is_empty() {
        transcript.push_assistant(reply);
    }
}
