//! Yes/no confirmation prompts.
//!
//! The pipeline asks through the [`Confirm`] trait so tests and `--yes` runs
//! can answer without a terminal.

use std::sync::Arc;

use dialoguer::console::Term;
use parking_lot::{const_mutex, Mutex};

/// Something that can answer a yes/no question.
pub trait Confirm: Send + Sync {
    fn confirm(&self, question: &str) -> bool;
}

/// Holds the terminal for one question/answer pair at a time so concurrent
/// prompts never interleave mid-line.
static PROMPT_LOCK: Mutex<()> = const_mutex(());

/// Asks interactively on the terminal. Defaults to no, and answers no when
/// there is no terminal to ask on.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalConfirm;

impl Confirm for TerminalConfirm {
    fn confirm(&self, question: &str) -> bool {
        let _guard = PROMPT_LOCK.lock();

        match dialoguer::Confirm::new()
            .with_prompt(question)
            .default(false)
            .interact_on(&Term::stderr())
        {
            Ok(answer) => answer,
            Err(e) => {
                tracing::warn!("Cannot ask {:?}: {}", question, e);
                false
            }
        }
    }
}

/// Always gives the same answer.
#[derive(Debug, Clone, Copy)]
pub struct AutoAnswer(pub bool);

impl Confirm for AutoAnswer {
    fn confirm(&self, question: &str) -> bool {
        tracing::debug!("{} -> {}", question, if self.0 { "yes" } else { "no" });
        self.0
    }
}

/// Ask on the blocking pool so a waiting prompt does not stall the runtime.
pub async fn ask(confirm: &Arc<dyn Confirm>, question: String) -> bool {
    let confirm = Arc::clone(confirm);
    match tokio::task::spawn_blocking(move || confirm.confirm(&question)).await {
        Ok(answer) => answer,
        Err(e) => {
            tracing::warn!("Prompt task failed: {}", e);
            false
        }
    }
}
