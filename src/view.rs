//! Text rendering of the verification screen.

use std::fmt;

use crate::flow::{Phase, Route};

/// Prompt shown in the upload area before a file is chosen.
pub const UPLOAD_PROMPT: &str = "Click to upload your student ID card";

/// A labelled link to another screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub label: &'static str,
    pub route: Route,
}

/// The submit control of the upload view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitButton {
    pub label: &'static str,
    pub enabled: bool,
}

/// What the screen shows for a given state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    /// No auth token: explain and link to login/signup.
    AuthRequired { links: Vec<Link> },

    /// Logged in: upload area, submit control and legal links.
    Upload {
        file_label: String,
        submit: SubmitButton,
        links: Vec<Link>,
    },
}

impl View {
    /// Build the view for the current flow state.
    pub fn render(logged_in: bool, phase: Phase, selected_file: Option<&str>) -> Self {
        if !logged_in {
            return View::AuthRequired {
                links: vec![
                    Link {
                        label: "Log In",
                        route: Route::Login,
                    },
                    Link {
                        label: "Sign Up",
                        route: Route::Signup,
                    },
                ],
            };
        }

        let label = match phase {
            Phase::Verifying => "Verifying Identity...",
            Phase::IssuingKey => "Generating API Key...",
            Phase::Idle => "Verify & Generate API Key",
        };

        View::Upload {
            file_label: selected_file.unwrap_or(UPLOAD_PROMPT).to_string(),
            submit: SubmitButton {
                label,
                enabled: phase == Phase::Idle && selected_file.is_some(),
            },
            links: vec![
                Link {
                    label: "Terms of Service",
                    route: Route::Terms,
                },
                Link {
                    label: "Privacy Policy",
                    route: Route::Privacy,
                },
            ],
        }
    }

    pub fn has_upload_control(&self) -> bool {
        matches!(self, View::Upload { .. })
    }

    pub fn links(&self) -> &[Link] {
        match self {
            View::AuthRequired { links } | View::Upload { links, .. } => links,
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            View::AuthRequired { links } => {
                writeln!(f, "Authentication Required")?;
                writeln!(f, "Please log in or sign up to get your API key")?;
                writeln!(f)?;
                writeln!(
                    f,
                    "You need to be authenticated to verify your identity and get an API key."
                )?;
                writeln!(f, "Please log in to your account or create a new one.")?;
                writeln!(f)?;
                for link in links {
                    writeln!(f, "  {} -> {}", link.label, link.route.path())?;
                }
            }
            View::Upload {
                file_label,
                submit,
                links,
            } => {
                writeln!(f, "Identity Verification")?;
                writeln!(f, "Upload your student ID to get API access")?;
                writeln!(f)?;
                writeln!(f, "Student ID: {}", file_label)?;
                writeln!(f, "Supported formats: JPG, PNG")?;
                writeln!(f)?;
                writeln!(
                    f,
                    "Your API key will be generated after successful verification."
                )?;
                let state = if submit.enabled { "" } else { " (disabled)" };
                writeln!(f, "[ {} ]{}", submit.label, state)?;
                write!(f, "By proceeding, you agree to our")?;
                for (i, link) in links.iter().enumerate() {
                    let sep = if i == 0 { " " } else { " and " };
                    write!(f, "{}{} ({})", sep, link.label, link.route.path())?;
                }
                writeln!(f, ".")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logged_out_renders_auth_required_without_upload() {
        let view = View::render(false, Phase::Idle, None);
        assert!(!view.has_upload_control());
        let routes: Vec<Route> = view.links().iter().map(|l| l.route).collect();
        assert_eq!(routes, vec![Route::Login, Route::Signup]);

        let text = view.to_string();
        assert!(text.contains("Authentication Required"));
        assert!(text.contains("/login"));
        assert!(!text.contains("Student ID"));
    }

    #[test]
    fn submit_disabled_until_file_selected() {
        let empty = View::render(true, Phase::Idle, None);
        match &empty {
            View::Upload {
                file_label, submit, ..
            } => {
                assert_eq!(file_label, UPLOAD_PROMPT);
                assert!(!submit.enabled);
            }
            other => panic!("unexpected view: {other:?}"),
        }

        let ready = View::render(true, Phase::Idle, Some("card.png"));
        assert!(matches!(
            ready,
            View::Upload { ref file_label, submit: SubmitButton { enabled: true, .. }, .. }
                if file_label == "card.png"
        ));
    }

    #[test]
    fn button_label_tracks_phase() {
        let label = |phase| match View::render(true, phase, Some("card.png")) {
            View::Upload { submit, .. } => (submit.label, submit.enabled),
            other => panic!("unexpected view: {other:?}"),
        };

        assert_eq!(label(Phase::Idle), ("Verify & Generate API Key", true));
        assert_eq!(label(Phase::Verifying), ("Verifying Identity...", false));
        assert_eq!(label(Phase::IssuingKey), ("Generating API Key...", false));
    }

    #[test]
    fn upload_view_links_legal_pages() {
        let text = View::render(true, Phase::Idle, None).to_string();
        assert!(text.contains("Terms of Service (/terms)"));
        assert!(text.contains("Privacy Policy (/privacy)"));
    }
}
