//! Class search and registration cards

use super::{Endpoints, field, name};
use crate::api::path;
use neon_client::EventSummary;
use shared::action::RegisterTarget;
use shared::card::{Button, Card, DateTimePicker, DecoratedText, Section, TextInput, Widget};

/// Search form plus the entry points to cancel and refund
pub fn class_home_card(endpoints: &Endpoints) -> Card {
    let section = |title: &str, label: &str, target: &str| {
        let mut section = Section::titled(title);
        section.uncollapsible_widgets_count = Some(1);
        section.widget(Widget::buttons(vec![
            Button::action(label, endpoints.action(target)).filled(),
        ]))
    };

    let mut add = Section::titled("Add Registration")
        .widget(TextInput::new(field::CLASS_NAME, "Class Name (required)"))
        .widget(DateTimePicker::date_only(
            field::CLASS_START_DATE,
            "Start date (optional)",
        ))
        .widget(DateTimePicker::date_only(
            field::CLASS_END_DATE,
            "End date (optional)",
        ))
        .widget(Widget::buttons(vec![
            Button::action("Search Classes", endpoints.action(path::SEARCH_CLASSES)).filled(),
        ]));
    add.uncollapsible_widgets_count = Some(1);

    Card::new()
        .named(name::CLASS_HOME)
        .section(add)
        .section(section(
            "Cancel Registration",
            "Cancel Registration",
            path::LIST_CANCELABLE,
        ))
        .section(section(
            "Refund Registration",
            "Refund Registration",
            path::LIST_REFUNDABLE,
        ))
}

/// An event from the search with its current registrant count
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventAvailability {
    pub event: EventSummary,
    pub registrants: u32,
}

impl EventAvailability {
    /// Full when the count has reached a reported capacity
    pub fn is_full(&self) -> bool {
        self.event
            .capacity
            .is_some_and(|capacity| self.registrants >= capacity)
    }

    fn seats_label(&self) -> String {
        match self.event.capacity {
            Some(capacity) => format!("{}/{} registered", self.registrants, capacity),
            None => format!("{} registered", self.registrants),
        }
    }
}

/// One row per event: name, date and time, and a Register or Full button
pub fn class_results_card(endpoints: &Endpoints, events: &[EventAvailability]) -> Card {
    let rows = events.iter().map(|availability| {
        let event = &availability.event;
        let when = [event.start_date.as_deref(), event.start_time.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ");
        let target = RegisterTarget {
            event_id: event.event_id.clone(),
            event_name: event.name.clone(),
        };
        let button = if availability.is_full() {
            Button::action("Full", endpoints.action(path::CLASS_REG)).disabled(true)
        } else {
            Button::action(
                "Register",
                endpoints
                    .action(path::CLASS_REG)
                    .params(target.to_parameters()),
            )
        };
        Widget::from(
            DecoratedText::new(when)
                .top_label(event.name.clone())
                .bottom_label(format!(
                    "Event ID {} · {}",
                    event.event_id,
                    availability.seats_label()
                ))
                .wrap()
                .button(button),
        )
    });

    Card::new()
        .named(name::CLASS_LIST)
        .header("Classes")
        .section(Section::new().widgets(rows))
}

/// Confirmation after a successful registration
pub fn registered_card(endpoints: &Endpoints, event_name: &str) -> Card {
    let mut section = Section::new().widget(Widget::text("<b>Successfully registered</b>"));
    if !event_name.is_empty() {
        section = section.widget(Widget::text(event_name.to_string()));
    }
    Card::new().section(section.widget(Widget::buttons(vec![
        Button::action(
            "Back to Classes",
            endpoints
                .action(path::POP_TO_CARD)
                .param(field::CARD, name::CLASS_LIST),
        ),
        Button::action("Home", endpoints.action(path::POP_TO_ROOT)),
    ])))
}
