//! Whether `filememo` is talking to a person or to a pipe

use console::Term;
use std::io::IsTerminal;

/// Environment variables set by the CI systems we know of
const CI_MARKERS: &[&str] = &[
    "CI",
    "GITHUB_ACTIONS",
    "GITLAB_CI",
    "CIRCLECI",
    "BUILDKITE",
    "JENKINS_URL",
];

/// Output mode for one command invocation
///
/// Styled output and prompts need a terminal on both stdout and stdin and no
/// CI marker. Otherwise every line is plain and prompts take their default,
/// which keeps `filememo list --format plain | wc -l` and scripted `clear`
/// predictable.
#[derive(Debug, Clone, Copy)]
pub struct UiContext {
    styled: bool,
    assume_yes: bool,
}

impl UiContext {
    pub fn detect() -> Self {
        Self {
            styled: Self::attended_terminal(),
            assume_yes: false,
        }
    }

    /// Plain output, prompts answered with their default
    pub fn plain() -> Self {
        Self {
            styled: false,
            assume_yes: false,
        }
    }

    /// Answer every confirmation with yes (`clear --yes`)
    pub fn assume_yes(self, assume_yes: bool) -> Self {
        Self { assume_yes, ..self }
    }

    pub fn is_styled(&self) -> bool {
        self.styled
    }

    pub fn answers_yes(&self) -> bool {
        self.assume_yes
    }

    fn attended_terminal() -> bool {
        Term::stdout().is_term()
            && std::io::stdin().is_terminal()
            && CI_MARKERS.iter().all(|var| std::env::var_os(var).is_none())
    }
}
