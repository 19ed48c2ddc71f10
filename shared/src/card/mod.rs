//! Card schema for Workspace add-on responses
//!
//! Every endpoint answers with a [`RenderActions`] document: one navigation
//! (push, update, pop, pop to a named card, pop to root) and optionally a
//! host-specific mutation such as adding CC recipients to an open draft.
//!
//! # Example
//!
//! ```
//! use shared::card::{Card, RenderActions, Section, Widget};
//!
//! let card = Card::new()
//!     .section(Section::new().widget(Widget::text("<b>Successfully registered</b>")));
//! let response = RenderActions::push(card);
//! ```

mod widgets;

pub use widgets::*;

use serde::{Deserialize, Serialize};

/// A remediation link shown under an error message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub label: String,
    pub url: String,
}

impl Link {
    pub fn new(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            url: url.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    /// Name used by `popToCard` navigations
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<CardHeader>,
    pub sections: Vec<Section>,
}

impl Card {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn header(mut self, title: impl Into<String>) -> Self {
        self.header = Some(CardHeader {
            title: title.into(),
            subtitle: None,
        });
        self
    }

    pub fn section(mut self, section: Section) -> Self {
        self.sections.push(section);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardHeader {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,
    pub collapsible: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uncollapsible_widgets_count: Option<u32>,
    pub widgets: Vec<Widget>,
}

impl Section {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn titled(header: impl Into<String>) -> Self {
        Self {
            header: Some(header.into()),
            ..Self::default()
        }
    }

    pub fn widget(mut self, widget: impl Into<Widget>) -> Self {
        self.widgets.push(widget.into());
        self
    }

    pub fn widgets(mut self, widgets: impl IntoIterator<Item = Widget>) -> Self {
        self.widgets.extend(widgets);
        self
    }
}

// ── Response document ──

/// Top-level response body for every add-on callback
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderActions {
    pub render_actions: ActionResponse,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<Action>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host_app_action: Option<HostAppAction>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub navigations: Vec<Navigation>,
}

/// Navigation instruction for the host's card stack
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Navigation {
    PushCard(Card),
    UpdateCard(Card),
    PopToCard(String),
    Pop(bool),
    PopToRoot(bool),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostAppAction {
    pub gmail_action: GmailAction,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GmailAction {
    pub update_draft_action_markup: UpdateDraftActionMarkup,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDraftActionMarkup {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update_cc_recipients: Option<CcRecipients>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CcRecipients {
    pub cc_recipients: Vec<String>,
}

impl RenderActions {
    pub fn navigate(navigations: Vec<Navigation>) -> Self {
        Self {
            render_actions: ActionResponse {
                action: Some(Action { navigations }),
                host_app_action: None,
            },
        }
    }

    pub fn push(card: Card) -> Self {
        Self::navigate(vec![Navigation::PushCard(card)])
    }

    pub fn update(card: Card) -> Self {
        Self::navigate(vec![Navigation::UpdateCard(card)])
    }

    pub fn pop() -> Self {
        Self::navigate(vec![Navigation::Pop(true)])
    }

    pub fn pop_to_root() -> Self {
        Self::navigate(vec![Navigation::PopToRoot(true)])
    }

    pub fn pop_to_card(name: impl Into<String>) -> Self {
        Self::navigate(vec![Navigation::PopToCard(name.into())])
    }

    /// Add CC recipients to the draft the user is composing
    pub fn with_cc_recipients(mut self, recipients: Vec<String>) -> Self {
        self.render_actions.host_app_action = Some(HostAppAction {
            gmail_action: GmailAction {
                update_draft_action_markup: UpdateDraftActionMarkup {
                    update_cc_recipients: Some(CcRecipients {
                        cc_recipients: recipients,
                    }),
                },
            },
        });
        self
    }
}

/// Error card shared by every failure path
pub fn error_card(message: &str, link: Option<&Link>) -> Card {
    let mut section = Section::new().widget(Widget::text(message));
    if let Some(link) = link {
        section = section.widget(Widget::buttons(vec![Button::open_link(
            link.label.clone(),
            link.url.clone(),
        )]));
    }
    Card::new().section(section)
}
