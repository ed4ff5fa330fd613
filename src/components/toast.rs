use dioxus::prelude::*;
use dioxus_primitives::toast::{self, ToastOptions};
use std::time::Duration;

/// App-wide toast host; pages reach it through `consume_toast()`
#[component]
pub fn ToastProvider(children: Element) -> Element {
    rsx! {
        toast::ToastProvider {
            {children}
        }
    }
}

/// Options for a transient notice with `description` as body
pub fn notice(description: &str) -> ToastOptions {
    ToastOptions::new()
        .description(description)
        .duration(Duration::from_secs(3))
        .permanent(false)
}
