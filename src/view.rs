//! Presentation
//! Turns application state into what the user sees

use serde::Serialize;
use std::fmt;

use crate::config::TLD;
use crate::state::AppState;

pub const TITLE: &str = "Trigon Domain Manager";

/// Rendered screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "screen", rename_all = "snake_case")]
pub enum View {
    /// No wallet connected: only the connect button
    Connect,
    /// Connected on the wrong network
    SwitchNetwork { account: String, required: String },
    /// Connected on the right network
    Manager {
        account: String,
        form: FormView,
        mints: MintsView,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormView {
    pub domain: String,
    pub record: String,
    pub submit: SubmitButton,
}

/// State of the form's submit button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmitButton {
    /// Disabled while a transaction is in flight
    Loading,
    Mint,
    Update,
}

impl SubmitButton {
    pub fn label(&self) -> &'static str {
        match self {
            SubmitButton::Loading => "Loading...",
            SubmitButton::Mint => "Mint Domain",
            SubmitButton::Update => "Update Domain",
        }
    }

    pub fn enabled(&self) -> bool {
        !matches!(self, SubmitButton::Loading)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "entries", rename_all = "snake_case")]
pub enum MintsView {
    Empty,
    Listed(Vec<MintCard>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MintCard {
    /// Pass to the edit action
    pub id: usize,
    pub name: String,
    pub record: String,
    pub owner: String,
}

/// Render the screen for the current state
pub fn render(state: &AppState, required_network: &str) -> View {
    let session = &state.session;
    if !session.is_connected() {
        return View::Connect;
    }

    let account = short_address(&session.account);
    if session.network != required_network {
        return View::SwitchNetwork {
            account,
            required: required_network.to_string(),
        };
    }

    let submit = if state.form.loading {
        SubmitButton::Loading
    } else if state.form.editing {
        SubmitButton::Update
    } else {
        SubmitButton::Mint
    };

    let mints = if state.mints.is_empty() {
        MintsView::Empty
    } else {
        MintsView::Listed(
            state
                .mints
                .iter()
                .map(|m| MintCard {
                    id: m.id,
                    name: m.name.clone(),
                    record: m.record.clone(),
                    owner: short_address(&m.owner),
                })
                .collect(),
        )
    };

    View::Manager {
        account,
        form: FormView {
            domain: state.form.domain.clone(),
            record: state.form.record.clone(),
            submit,
        },
        mints,
    }
}

/// First 6 and last 4 characters of an address: `0x1234...abcd`
pub fn short_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= 10 {
        return address.to_string();
    }

    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{TITLE}")?;
        writeln!(f, "{}", "=".repeat(TITLE.len()))?;

        match self {
            View::Connect => writeln!(f, "[ Connect Wallet ]"),
            View::SwitchNetwork { account, required } => {
                writeln!(f, "Connected to: {account}")?;
                writeln!(f, "Please connect to the {required} Blockchain")?;
                writeln!(f, "[ Click here to switch ]")
            }
            View::Manager {
                account,
                form,
                mints,
            } => {
                writeln!(f, "Connected to: {account}")?;
                writeln!(f)?;
                writeln!(f, "Domain: {}{TLD}", display_or(&form.domain, "(min 3 characters)"))?;
                writeln!(f, "Record: {}", display_or(&form.record, "(optional)"))?;
                if form.submit.enabled() {
                    writeln!(f, "[ {} ]", form.submit.label())?;
                } else {
                    writeln!(f, "[ {} ] (disabled)", form.submit.label())?;
                }
                writeln!(f)?;
                writeln!(f, "Your Mints")?;
                writeln!(f, "----------")?;

                match mints {
                    MintsView::Empty => writeln!(f, "No domains minted yet."),
                    MintsView::Listed(cards) => {
                        for card in cards {
                            writeln!(f, "#{} {}{TLD}", card.id, card.name)?;
                            if !card.record.is_empty() {
                                writeln!(f, "   {}", card.record)?;
                            }
                            writeln!(f, "   Owned by: {}", card.owner)?;
                            writeln!(f, "   [ Edit Record ]")?;
                        }
                        Ok(())
                    }
                }
            }
        }
    }
}

fn display_or<'a>(value: &'a str, placeholder: &'a str) -> &'a str {
    if value.is_empty() {
        placeholder
    } else {
        value
    }
}
