use std::io::Write;
use tracing::warn;

/// The two blocking UI primitives the controllers need. Everything else is
/// rendered from [`crate::AppState`].
pub trait Frontend: Send + Sync {
    /// Shows a notice the user has to acknowledge.
    fn alert(&self, message: &str);
    /// Asks a yes/no question; `false` unless the user explicitly agrees.
    fn confirm(&self, message: &str) -> bool;
}

/// Terminal implementation.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleFrontend;

impl Frontend for ConsoleFrontend {
    fn alert(&self, message: &str) {
        eprintln!("! {message}");
    }

    fn confirm(&self, message: &str) -> bool {
        print!("{message} [y/N]: ");
        if let Err(e) = std::io::stdout().flush() {
            warn!(error = %e, "failed to flush prompt");
        }

        let mut input = String::new();
        match std::io::stdin().read_line(&mut input) {
            Ok(_) => is_yes(&input),
            Err(e) => {
                warn!(error = %e, "failed to read confirmation");
                false
            }
        }
    }
}

fn is_yes(input: &str) -> bool {
    let answer = input.trim();
    answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes")
}
