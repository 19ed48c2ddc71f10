//! Gift certificate purchaser card

use neon_client::OrderSummary;
use shared::card::{Card, DecoratedText, Section};

pub fn gift_certificate_card(cart_id: &str, order: &OrderSummary) -> Card {
    let mut section = Section::titled(format!("Gift Certificate {cart_id}"))
        .widget(DecoratedText::new(order.full_name()).top_label("Purchaser"))
        .widget(DecoratedText::new(order.account_id.clone()).top_label("Neon ID"));
    if let Some(email) = &order.email {
        section = section.widget(DecoratedText::new(email.clone()).top_label("Email"));
    }
    if let Some(date) = &order.order_date {
        section = section.widget(DecoratedText::new(date.clone()).top_label("Purchased"));
    }
    Card::new().section(section)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optional_rows_are_skipped() {
        let order = OrderSummary {
            account_id: "77".into(),
            first_name: "Bob".into(),
            last_name: "Ross".into(),
            email: None,
            cart_id: Some("4411".into()),
            order_date: Some("2023-12-01".into()),
        };
        let card = gift_certificate_card("4411", &order);
        assert_eq!(card.sections[0].widgets.len(), 3);
        assert_eq!(
            card.sections[0].header.as_deref(),
            Some("Gift Certificate 4411")
        );
    }
}
