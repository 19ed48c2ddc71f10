//! Home cards and the account identity card

use super::{Endpoints, field, name};
use crate::api::path;
use neon_client::AccountSummary;
use shared::card::{Button, Card, DecoratedText, Section, TextInput, Widget};

fn gift_certificate_section(endpoints: &Endpoints) -> Section {
    Section::titled("Gift Certificates")
        .widget(
            TextInput::new(field::GIFT_CERT_NUMBER, "Gift Certificate Number")
                .hint("Digits only"),
        )
        .widget(Widget::buttons(vec![
            Button::action("Look Up", endpoints.action(path::GIFT_CERT_LOOKUP)).filled(),
        ]))
}

fn settings_section(endpoints: &Endpoints) -> Section {
    Section::new()
        .widget(Widget::divider())
        .widget(Widget::buttons(vec![Button::action(
            "Settings",
            endpoints.action(path::SETTINGS),
        )]))
}

/// Shown when no message is open
pub fn home_card(endpoints: &Endpoints) -> Card {
    Card::new()
        .named(name::HOME)
        .header("Asmbly")
        .section(
            Section::titled("Classes")
                .widget(Widget::text("Open an email to work with a member's account."))
                .widget(Widget::buttons(vec![
                    Button::action("Classes", endpoints.action(path::CLASS_HOME_PAGE)).filled(),
                ])),
        )
        .section(gift_certificate_section(endpoints))
        .section(settings_section(endpoints))
}

/// Shown when a message or draft is open
pub fn contextual_home_card(endpoints: &Endpoints) -> Card {
    Card::new()
        .named(name::HOME)
        .header("Asmbly")
        .section(
            Section::titled("Member").widget(Widget::buttons(vec![
                Button::action("Get Neon ID", endpoints.action(path::GET_NEON_ID)).filled(),
                Button::action("Check Access", endpoints.action(path::CHECK_ACCESS)),
                Button::action("Update Openpath", endpoints.action(path::UPDATE_OP)),
            ])),
        )
        .section(
            Section::titled("Classes").widget(Widget::buttons(vec![
                Button::action("Classes", endpoints.action(path::CLASS_HOME_PAGE)).filled(),
            ])),
        )
        .section(gift_certificate_section(endpoints))
        .section(settings_section(endpoints))
}

/// Account name over its Neon ID
pub fn account_card(account: &AccountSummary) -> Card {
    Card::new().section(
        Section::new()
            .widget(DecoratedText::new(account.account_id.clone()).top_label(account.full_name())),
    )
}
