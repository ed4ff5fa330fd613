use dioxus::prelude::*;

use super::icons::XIcon;

/// Dialog shell shared by every form and details panel
#[component]
pub fn Modal(
    title: String,
    on_close: EventHandler<()>,
    #[props(default = false)] wide: bool,
    children: Element,
) -> Element {
    let width = if wide { "max-w-3xl" } else { "max-w-lg" };

    rsx! {
        div {
            class: "fixed inset-0 bg-black/50 z-50 flex items-center justify-center p-4",
            onclick: move |_| on_close.call(()),

            div {
                class: "bg-card border border-border rounded-xl {width} w-full max-h-[90vh] overflow-y-auto shadow-xl",
                role: "dialog",
                aria_modal: "true",
                onclick: move |e| e.stop_propagation(),

                div {
                    class: "flex items-center justify-between px-6 py-4 border-b border-border",
                    h2 {
                        class: "text-lg font-bold",
                        "{title}"
                    }
                    button {
                        class: "p-1 rounded-lg hover:bg-accent transition",
                        aria_label: "Fechar",
                        onclick: move |_| on_close.call(()),
                        XIcon { class: "w-5 h-5" }
                    }
                }

                div {
                    class: "p-6",
                    {children}
                }
            }
        }
    }
}
