//! Settings form for the per-user API keys

use super::{Endpoints, field};
use crate::api::path;
use shared::card::{Button, Card, Section, TextInput, Widget};

/// Inputs start empty; stored keys are never sent back to the client
pub fn settings_card(endpoints: &Endpoints) -> Card {
    Card::new().header("Settings").section(
        Section::titled("API Keys")
            .widget(TextInput::new(field::NEON_API_KEY, "Neon API Key"))
            .widget(TextInput::new(field::OPENPATH_USER, "Openpath API User"))
            .widget(TextInput::new(field::OPENPATH_KEY, "Openpath API Key"))
            .widget(Widget::buttons(vec![
                Button::action("Save", endpoints.action(path::SUBMIT_SETTINGS)).filled(),
            ])),
    )
}

pub fn settings_saved_card() -> Card {
    Card::new().section(Section::new().widget(Widget::text("<b>Settings saved</b>")))
}
