//! Door access cards

use super::field;
use neon_client::AccountSummary;
use shared::card::{Card, Section, SelectionInput, SelectionItem, SelectionType, Widget};

/// Checklist of the three access requirements
pub fn access_checklist_card(account: &AccountSummary) -> Card {
    let item = |text: &str, value: &str, selected: bool| SelectionItem {
        text: text.to_string(),
        value: value.to_string(),
        selected,
    };
    let checklist = SelectionInput {
        name: field::CHECK_LIST.to_string(),
        label: format!(
            "Account Name: {}; Account ID: {}",
            account.full_name(),
            account.account_id
        ),
        kind: SelectionType::CheckBox,
        items: vec![
            item("Waiver", "1", account.has_waiver()),
            item("Orientation/Facility Tour", "2", account.has_facility_tour()),
            item("Active Membership", "3", account.has_active_membership()),
        ],
    };
    let mut section = Section::new().widget(checklist);
    section.uncollapsible_widgets_count = Some(1);
    Card::new().section(section)
}

/// Requirements still missing on the account, in checklist order
pub fn missing_requirements(account: &AccountSummary) -> Vec<&'static str> {
    [
        (account.has_waiver(), "Waiver"),
        (account.has_facility_tour(), "Orientation/Facility Tour"),
        (account.has_active_membership(), "Active Membership"),
    ]
    .into_iter()
    .filter(|(done, _)| !done)
    .map(|(_, label)| label)
    .collect()
}

pub fn access_updated_card() -> Card {
    Card::new().section(Section::new().widget(Widget::text("<b>Openpath Updated</b>")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(waiver: bool, tour: bool, membership: bool) -> AccountSummary {
        let date = |set: bool| set.then(|| "2023-04-01".to_string());
        AccountSummary {
            account_id: "1234".into(),
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: Some("ada@example.org".into()),
            membership_start_date: date(membership),
            waiver_date: date(waiver),
            facility_tour_date: date(tour),
        }
    }

    #[test]
    fn test_checklist_reflects_account() {
        let json =
            serde_json::to_value(access_checklist_card(&account(true, false, true))).unwrap();
        let input = &json["sections"][0]["widgets"][0]["selectionInput"];
        assert_eq!(input["type"], "CHECK_BOX");
        assert_eq!(input["name"], "checkList");
        assert_eq!(input["label"], "Account Name: Ada Lovelace; Account ID: 1234");
        assert_eq!(input["items"][0]["selected"], true);
        assert_eq!(input["items"][1]["text"], "Orientation/Facility Tour");
        assert_eq!(input["items"][1]["selected"], false);
        assert_eq!(input["items"][2]["value"], "3");
    }

    #[test]
    fn test_missing_requirements() {
        assert!(missing_requirements(&account(true, true, true)).is_empty());
        assert_eq!(
            missing_requirements(&account(false, true, false)),
            vec!["Waiver", "Active Membership"]
        );
    }
}
