//! Card widgets
//!
//! Field names follow the host's JSON schema (camelCase). Only the widgets
//! the add-on renders are modelled.

use serde::{Deserialize, Serialize};

/// One widget inside a section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Widget {
    TextParagraph(TextParagraph),
    DecoratedText(DecoratedText),
    ButtonList(ButtonList),
    TextInput(TextInput),
    DateTimePicker(DateTimePicker),
    SelectionInput(SelectionInput),
    Divider(Divider),
}

impl Widget {
    pub fn text(text: impl Into<String>) -> Self {
        Self::TextParagraph(TextParagraph { text: text.into() })
    }

    pub fn buttons(buttons: Vec<Button>) -> Self {
        Self::ButtonList(ButtonList { buttons })
    }

    pub fn divider() -> Self {
        Self::Divider(Divider {})
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextParagraph {
    pub text: String,
}

/// A row with optional labels above and below the text, and an optional
/// trailing button
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecoratedText {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_label: Option<String>,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bottom_label: Option<String>,
    pub wrap_text: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub button: Option<Button>,
}

impl DecoratedText {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn top_label(mut self, label: impl Into<String>) -> Self {
        self.top_label = Some(label.into());
        self
    }

    pub fn bottom_label(mut self, label: impl Into<String>) -> Self {
        self.bottom_label = Some(label.into());
        self
    }

    pub fn wrap(mut self) -> Self {
        self.wrap_text = true;
        self
    }

    pub fn button(mut self, button: Button) -> Self {
        self.button = Some(button);
        self
    }
}

impl From<DecoratedText> for Widget {
    fn from(value: DecoratedText) -> Self {
        Widget::DecoratedText(value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ButtonList {
    pub buttons: Vec<Button>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Button {
    pub text: String,
    pub on_click: OnClick,
    pub disabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
}

impl Button {
    /// Button that posts back to one of the add-on endpoints
    pub fn action(text: impl Into<String>, action: CallbackAction) -> Self {
        Self {
            text: text.into(),
            on_click: OnClick::Action(action),
            disabled: false,
            color: None,
        }
    }

    /// Button that opens a URL in a new tab
    pub fn open_link(text: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            on_click: OnClick::OpenLink(OpenLink { url: url.into() }),
            disabled: false,
            color: None,
        }
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn filled(mut self) -> Self {
        self.color = Some(Color::BRAND);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OnClick {
    Action(CallbackAction),
    OpenLink(OpenLink),
}

/// Callback to an add-on endpoint, with string parameters that come back in
/// `commonEventObject.parameters`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallbackAction {
    pub function: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<ActionParameter>,
}

impl CallbackAction {
    pub fn new(function: impl Into<String>) -> Self {
        Self {
            function: function.into(),
            parameters: Vec::new(),
        }
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.push(ActionParameter {
            key: key.into(),
            value: value.into(),
        });
        self
    }

    pub fn params(mut self, parameters: impl IntoIterator<Item = ActionParameter>) -> Self {
        self.parameters.extend(parameters);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionParameter {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenLink {
    pub url: String,
}

/// RGB in the 0..=1 range
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub red: f32,
    pub green: f32,
    pub blue: f32,
}

impl Color {
    pub const BRAND: Color = Color {
        red: 0.04,
        green: 0.40,
        blue: 0.51,
    };
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextInput {
    pub name: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(rename = "type")]
    pub kind: TextInputType,
}

impl TextInput {
    pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            hint_text: None,
            value: None,
            kind: TextInputType::SingleLine,
        }
    }

    pub fn hint(mut self, hint: impl Into<String>) -> Self {
        self.hint_text = Some(hint.into());
        self
    }
}

impl From<TextInput> for Widget {
    fn from(value: TextInput) -> Self {
        Widget::TextInput(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TextInputType {
    SingleLine,
    MultipleLine,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateTimePicker {
    pub name: String,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: DateTimePickerType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_ms_epoch: Option<i64>,
}

impl DateTimePicker {
    pub fn date_only(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            kind: DateTimePickerType::DateOnly,
            value_ms_epoch: None,
        }
    }
}

impl From<DateTimePicker> for Widget {
    fn from(value: DateTimePicker) -> Self {
        Widget::DateTimePicker(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DateTimePickerType {
    DateOnly,
    DateAndTime,
    TimeOnly,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionInput {
    pub name: String,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: SelectionType,
    pub items: Vec<SelectionItem>,
}

impl From<SelectionInput> for Widget {
    fn from(value: SelectionInput) -> Self {
        Widget::SelectionInput(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SelectionType {
    CheckBox,
    RadioButton,
    Dropdown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionItem {
    pub text: String,
    pub value: String,
    pub selected: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Divider {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_widget_tags_are_camel_case() {
        let value = serde_json::to_value(Widget::text("hi")).unwrap();
        assert_eq!(value, json!({"textParagraph": {"text": "hi"}}));

        let value = serde_json::to_value(Widget::divider()).unwrap();
        assert_eq!(value, json!({"divider": {}}));
    }

    #[test]
    fn test_action_button_serializes_parameters() {
        let button = Button::action(
            "Cancel",
            CallbackAction::new("https://addon.test/classCancel").param("registrationId", "42"),
        )
        .filled();
        let value = serde_json::to_value(&button).unwrap();
        assert_eq!(value["onClick"]["action"]["function"], "https://addon.test/classCancel");
        assert_eq!(value["onClick"]["action"]["parameters"][0]["key"], "registrationId");
        assert_eq!(value["onClick"]["action"]["parameters"][0]["value"], "42");
        assert_eq!(value["disabled"], false);
        assert!(value["color"]["red"].as_f64().is_some());
    }

    #[test]
    fn test_inputs_use_type_key() {
        let value =
            serde_json::to_value(Widget::from(DateTimePicker::date_only("d", "Date"))).unwrap();
        assert_eq!(value["dateTimePicker"]["type"], "DATE_ONLY");
        assert!(value["dateTimePicker"].get("valueMsEpoch").is_none());

        let value =
            serde_json::to_value(Widget::from(TextInput::new("className", "Class"))).unwrap();
        assert_eq!(value["textInput"]["type"], "SINGLE_LINE");
    }
}
