//! Upcoming registrations and the cancel/refund confirmation flow

use super::{Endpoints, field, name};
use crate::api::path;
use neon_client::UpcomingRegistration;
use shared::action::{PendingKind, PendingRegistrationAction};
use shared::card::{Button, Card, DecoratedText, Section, Widget};

fn request_path(kind: PendingKind) -> &'static str {
    match kind {
        PendingKind::Cancel => path::CLASS_CANCEL,
        PendingKind::Refund => path::CLASS_REFUND,
    }
}

fn confirm_path(kind: PendingKind) -> &'static str {
    match kind {
        PendingKind::Cancel => path::CLASS_CANCEL_CONFIRM,
        PendingKind::Refund => path::CLASS_REFUND_CONFIRM,
    }
}

/// One row per upcoming registration with a Cancel or Refund button
pub fn registrations_card(
    endpoints: &Endpoints,
    kind: PendingKind,
    account_id: &str,
    registrations: &[UpcomingRegistration],
) -> Card {
    let rows = registrations.iter().map(|registration| {
        let pending = PendingRegistrationAction {
            kind,
            registration_id: registration.registration_id.clone(),
            event_id: registration.event_id.clone(),
            account_id: account_id.to_string(),
            event_name: registration.event_name.clone(),
            event_date: registration.event_date.to_string(),
        };
        Widget::from(
            DecoratedText::new(registration.event_name.clone())
                .top_label(registration.event_date.format("%a %b %-d, %Y").to_string())
                .bottom_label(format!(
                    "Registration {} · {}",
                    registration.registration_id, registration.status
                ))
                .wrap()
                .button(Button::action(
                    kind.label(),
                    endpoints
                        .action(request_path(kind))
                        .params(pending.to_parameters()),
                )),
        )
    });

    Card::new()
        .named(name::REGISTRATION_LIST)
        .header(format!("{} Registration", kind.label()))
        .section(Section::new().widgets(rows))
}

/// Yes carries the pending action forward; No pops this card
pub fn confirm_card(endpoints: &Endpoints, pending: &PendingRegistrationAction) -> Card {
    let verb = match pending.kind {
        PendingKind::Cancel => "Cancel",
        PendingKind::Refund => "Cancel and refund",
    };
    let subject = if pending.event_name.is_empty() {
        format!("registration {}", pending.registration_id)
    } else {
        format!("<b>{}</b>", pending.event_name)
    };
    let when = if pending.event_date.is_empty() {
        String::new()
    } else {
        format!(" on {}", pending.event_date)
    };

    Card::new().section(
        Section::new()
            .widget(Widget::text(format!("{verb} {subject}{when}?")))
            .widget(Widget::buttons(vec![
                Button::action(
                    "Yes",
                    endpoints
                        .action(confirm_path(pending.kind))
                        .params(pending.to_parameters()),
                )
                .filled(),
                Button::action("No", endpoints.action(path::POP)),
            ])),
    )
}

/// Result of a confirmed cancel or refund
pub fn action_complete_card(endpoints: &Endpoints, pending: &PendingRegistrationAction) -> Card {
    let headline = match pending.kind {
        PendingKind::Cancel => "<b>Registration Canceled</b>",
        PendingKind::Refund => "<b>Registration Refunded</b>",
    };
    let mut section = Section::new().widget(Widget::text(headline));
    if !pending.event_name.is_empty() {
        section = section.widget(Widget::text(pending.event_name.clone()));
    }
    Card::new().section(section.widget(Widget::buttons(vec![
        Button::action(
            "Back to Classes",
            endpoints
                .action(path::POP_TO_CARD)
                .param(field::CARD, name::CLASS_HOME),
        ),
        Button::action("Home", endpoints.action(path::POP_TO_ROOT)),
    ])))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::test_support::{buttons, endpoints, function};
    use chrono::NaiveDate;
    use std::collections::HashMap;

    fn pending(kind: PendingKind) -> PendingRegistrationAction {
        PendingRegistrationAction {
            kind,
            registration_id: "901".into(),
            event_id: "55".into(),
            account_id: "1234".into(),
            event_name: "Laser Cutter Basics".into(),
            event_date: "2024-01-12".into(),
        }
    }

    fn parameters(button: &Button) -> HashMap<String, String> {
        match &button.on_click {
            shared::card::OnClick::Action(action) => action
                .parameters
                .iter()
                .map(|p| (p.key.clone(), p.value.clone()))
                .collect(),
            shared::card::OnClick::OpenLink(_) => HashMap::new(),
        }
    }

    #[test]
    fn test_list_buttons_carry_pending_action() {
        let registrations = vec![UpcomingRegistration {
            registration_id: "901".into(),
            event_id: "55".into(),
            event_name: "Laser Cutter Basics".into(),
            event_date: NaiveDate::from_ymd_opt(2024, 1, 12).unwrap(),
            status: "SUCCEEDED".into(),
        }];
        let card = registrations_card(&endpoints(), PendingKind::Refund, "1234", &registrations);
        let button = buttons(&card)[0];
        assert_eq!(button.text, "Refund");
        assert_eq!(function(button), "https://addon.example/classRefund");

        let round_trip = PendingRegistrationAction::from_parameters(&parameters(button)).unwrap();
        assert_eq!(round_trip, pending(PendingKind::Refund));
    }

    #[test]
    fn test_confirm_card_yes_and_no() {
        let card = confirm_card(&endpoints(), &pending(PendingKind::Cancel));
        let buttons = buttons(&card);
        assert_eq!(function(buttons[0]), "https://addon.example/classCancelConfirm");
        assert_eq!(
            parameters(buttons[0]).get("registrationId").map(String::as_str),
            Some("901")
        );
        assert_eq!(function(buttons[1]), "https://addon.example/pop");
        assert!(parameters(buttons[1]).is_empty());
    }

    #[test]
    fn test_complete_card_offers_class_list_and_root() {
        let card = action_complete_card(&endpoints(), &pending(PendingKind::Cancel));
        let json = serde_json::to_value(&card).unwrap();
        assert_eq!(
            json["sections"][0]["widgets"][0]["textParagraph"]["text"],
            "<b>Registration Canceled</b>"
        );
        let buttons = buttons(&card);
        assert_eq!(function(buttons[0]), "https://addon.example/popToCard");
        assert_eq!(
            parameters(buttons[0]).get("card").map(String::as_str),
            Some(name::CLASS_HOME)
        );
        assert_eq!(function(buttons[1]), "https://addon.example/popToRoot");
    }
}
