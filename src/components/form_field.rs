use dioxus::prelude::*;

pub const INPUT_CLASS: &str =
    "w-full px-3 py-2 bg-background border border-border rounded-lg focus:outline-none focus:ring-2 focus:ring-primary";
const INPUT_ERROR_CLASS: &str =
    "w-full px-3 py-2 bg-background border border-red-500 rounded-lg focus:outline-none focus:ring-2 focus:ring-red-500";

/// Labelled text input showing the validation message for its field
#[component]
pub fn TextField(
    label: String,
    name: String,
    value: String,
    #[props(default)] error: Option<String>,
    on_input: EventHandler<String>,
    #[props(default = "text".to_string())] input_type: String,
    #[props(default)] placeholder: String,
    #[props(default = false)] required: bool,
    #[props(default = false)] disabled: bool,
) -> Element {
    let class = if error.is_some() { INPUT_ERROR_CLASS } else { INPUT_CLASS };

    rsx! {
        div {
            class: "space-y-1",
            label {
                class: "block text-sm font-medium",
                r#for: "{name}",
                "{label}"
                if required {
                    span { class: "text-red-500 ml-0.5", "*" }
                }
            }
            input {
                id: "{name}",
                name: "{name}",
                class: "{class}",
                r#type: "{input_type}",
                placeholder: "{placeholder}",
                disabled,
                value: "{value}",
                oninput: move |e| on_input.call(e.value()),
            }
            if let Some(message) = error {
                p {
                    class: "text-sm text-red-600 dark:text-red-400",
                    "{message}"
                }
            }
        }
    }
}

/// Banner listing the general error of a failed submission
#[component]
pub fn FormAlert(message: Option<String>) -> Element {
    rsx! {
        if let Some(message) = message {
            div {
                class: "p-3 mb-4 bg-red-100 dark:bg-red-900 text-red-800 dark:text-red-200 rounded-lg text-sm",
                "{message}"
            }
        }
    }
}
