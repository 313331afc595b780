//! Terminal REPL — one local session over stdin/stdout.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::error;

use crate::conversation::ConversationHistory;
use crate::orchestrator::ResponseOrchestrator;

/// Run the REPL on the process's stdin and stdout until EOF or a quit command.
pub async fn run_repl(
    orchestrator: &ResponseOrchestrator,
    max_turns: Option<usize>,
) -> anyhow::Result<()> {
    let reader = BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();
    run(orchestrator, reader, &mut stdout, max_turns).await
}

/// REPL loop over arbitrary input and output.
pub async fn run<R, W>(
    orchestrator: &ResponseOrchestrator,
    reader: R,
    out: &mut W,
    max_turns: Option<usize>,
) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut history = ConversationHistory::with_capacity_limit(max_turns);
    let mut lines = reader.lines();

    eprint!("> ");
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            eprint!("> ");
            continue;
        }

        match line {
            "exit" | "quit" | "/quit" => break,
            "/history" => {
                for turn in history.history() {
                    let entry = format!(
                        "[{}] you: {}\n      bot: {} ({}, {})\n",
                        turn.timestamp.format("%H:%M:%S"),
                        turn.message,
                        turn.reply,
                        turn.intent,
                        turn.sentiment
                    );
                    out.write_all(entry.as_bytes()).await?;
                }
            }
            "/mood" => {
                let summary = orchestrator.summarize(&history);
                let entry = format!(
                    "mood: {} (average {:.2} over {} turns)\n",
                    summary.label, summary.average_score, summary.turns
                );
                out.write_all(entry.as_bytes()).await?;
            }
            text => match orchestrator.handle(&mut history, text).await {
                Ok(reply) => {
                    let entry = format!("\n{}\n[{} {}]\n\n", reply.reply, reply.sentiment, reply.score);
                    out.write_all(entry.as_bytes()).await?;
                }
                Err(e) => {
                    error!(error = %e, "Failed to handle message");
                    out.write_all(format!("error: {e}\n").as_bytes()).await?;
                }
            },
        }
        out.flush().await?;
        eprint!("> ");
    }

    out.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::intent::matcher::test_support::FixedClassifier;
    use crate::intent::{IntentMatcher, ResponseEntry, ResponseTable};
    use crate::sentiment::{LexiconScorer, SentimentWordList};
    use crate::tokenizer::Tokenizer;

    fn orchestrator() -> ResponseOrchestrator {
        let lexicon = SentimentWordList::new(["good"], ["bad"]).unwrap();
        let scorer = LexiconScorer::new(Arc::new(lexicon), Arc::new(Tokenizer::default()));
        let responses: ResponseTable = [("general", ResponseEntry::Single("Go on.".into()))]
            .into_iter()
            .collect();
        let matcher = IntentMatcher::new(FixedClassifier::new("general"), Arc::new(responses));
        ResponseOrchestrator::new(scorer, matcher)
    }

    async fn drive(input: &str) -> String {
        let orch = orchestrator();
        let mut out = Vec::new();
        run(&orch, input.as_bytes(), &mut out, None).await.unwrap();
        String::from_utf8(out).unwrap()
    }

    #[tokio::test]
    async fn replies_to_each_line() {
        let out = drive("good day\n\nbad day\n").await;
        assert_eq!(out.matches("Go on.").count(), 2);
        assert!(out.contains("[Positive 1]"));
        assert!(out.contains("[Negative -1]"));
    }

    #[tokio::test]
    async fn quit_stops_reading() {
        let out = drive("hello\nquit\nnever seen\n").await;
        assert_eq!(out.matches("Go on.").count(), 1);
    }

    #[tokio::test]
    async fn history_and_mood_commands() {
        let out = drive("good\ngood\n/history\n/mood\n").await;
        assert_eq!(out.matches("you: good").count(), 2);
        assert!(out.contains("mood: Positive (average 1.00 over 2 turns)"));
    }
}
