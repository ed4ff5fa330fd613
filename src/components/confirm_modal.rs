use dioxus::prelude::*;

/// Reusable confirmation modal component
#[component]
pub fn ConfirmModal(
    title: String,
    message: String,
    confirm_text: Option<String>,
    cancel_text: Option<String>,
    #[props(default = true)] destructive: bool,
    #[props(default = false)] busy: bool,
    on_confirm: EventHandler<()>,
    on_cancel: EventHandler<()>,
) -> Element {
    let confirm_class = if destructive {
        "px-4 py-2 bg-destructive text-destructive-foreground rounded-lg hover:bg-destructive/90 transition disabled:opacity-50"
    } else {
        "px-4 py-2 bg-primary text-primary-foreground rounded-lg hover:bg-primary/90 transition disabled:opacity-50"
    };

    rsx! {
        // Modal overlay - clicking outside cancels
        div {
            class: "fixed inset-0 bg-black/50 z-50 flex items-center justify-center p-4",
            onclick: move |_| {
                if !busy {
                    on_cancel.call(())
                }
            },

            div {
                class: "bg-card border border-border rounded-xl max-w-sm w-full p-6 shadow-xl",
                role: "dialog",
                aria_modal: "true",
                aria_labelledby: "modal-title",
                aria_describedby: "modal-message",
                onclick: move |e| e.stop_propagation(),

                h2 {
                    class: "text-lg font-bold mb-2",
                    id: "modal-title",
                    "{title}"
                }

                p {
                    class: "text-muted-foreground mb-6",
                    id: "modal-message",
                    "{message}"
                }

                div {
                    class: "flex gap-3 justify-end",

                    button {
                        class: "px-4 py-2 rounded-lg hover:bg-accent transition",
                        disabled: busy,
                        onclick: move |_| on_cancel.call(()),
                        { cancel_text.clone().unwrap_or_else(|| "Cancelar".to_string()) }
                    }

                    button {
                        class: "{confirm_class}",
                        disabled: busy,
                        onclick: move |_| on_confirm.call(()),
                        if busy {
                            "Aguarde..."
                        } else {
                            { confirm_text.clone().unwrap_or_else(|| "Confirmar".to_string()) }
                        }
                    }
                }
            }
        }
    }
}
