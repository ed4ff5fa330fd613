use dioxus::prelude::*;

#[component]
pub fn ErrorBanner(message: String, on_retry: Option<EventHandler<()>>) -> Element {
    rsx! {
        div {
            class: "p-4",
            div {
                class: "p-4 bg-red-100 dark:bg-red-900 text-red-800 dark:text-red-200 rounded-lg flex items-center justify-between gap-4",
                span { "❌ {message}" }
                if let Some(retry) = on_retry {
                    button {
                        class: "px-3 py-1 rounded-lg border border-red-300 dark:border-red-700 hover:bg-red-200 dark:hover:bg-red-800 transition text-sm",
                        onclick: move |_| retry.call(()),
                        "Tentar novamente"
                    }
                }
            }
        }
    }
}

/// Empty list placeholder. With `on_clear` set it reads as "search matched
/// nothing" and offers to clear the search.
#[component]
pub fn EmptyState(
    icon: &'static str,
    title: String,
    #[props(default)] hint: Option<String>,
    on_clear: Option<EventHandler<()>>,
) -> Element {
    rsx! {
        div {
            class: "text-center py-12",
            div {
                class: "text-6xl mb-4",
                "{icon}"
            }
            h3 {
                class: "text-xl font-semibold mb-2",
                "{title}"
            }
            if let Some(hint) = hint {
                p {
                    class: "text-muted-foreground mb-4",
                    "{hint}"
                }
            }
            if let Some(clear) = on_clear {
                button {
                    class: "px-4 py-2 rounded-lg border border-border hover:bg-accent transition",
                    onclick: move |_| clear.call(()),
                    "Limpar busca"
                }
            }
        }
    }
}

/// Page title bar, sticky like the rest of the app's headers
#[component]
pub fn PageHeader(title: String, #[props(default)] subtitle: Option<String>, children: Element) -> Element {
    rsx! {
        div {
            class: "sticky top-0 z-20 bg-background/80 backdrop-blur-sm border-b border-border",
            div {
                class: "px-4 py-3 flex flex-wrap items-center justify-between gap-3",
                div {
                    h2 {
                        class: "text-xl font-bold",
                        "{title}"
                    }
                    if let Some(subtitle) = subtitle {
                        p {
                            class: "text-sm text-muted-foreground",
                            "{subtitle}"
                        }
                    }
                }
                div {
                    class: "flex flex-wrap items-center gap-2",
                    {children}
                }
            }
        }
    }
}

#[component]
pub fn StatCard(
    label: String,
    value: String,
    #[props(default)] detail: Option<String>,
    #[props(default = "📊")] icon: &'static str,
) -> Element {
    rsx! {
        div {
            class: "bg-card border border-border rounded-xl p-4 flex items-center gap-4",
            div {
                class: "text-3xl",
                "{icon}"
            }
            div {
                class: "min-w-0",
                p {
                    class: "text-sm text-muted-foreground",
                    "{label}"
                }
                p {
                    class: "text-2xl font-bold truncate",
                    "{value}"
                }
                if let Some(detail) = detail {
                    p {
                        class: "text-xs text-muted-foreground",
                        "{detail}"
                    }
                }
            }
        }
    }
}

#[component]
pub fn Badge(label: String, class: String) -> Element {
    rsx! {
        span {
            class: "inline-flex items-center px-2 py-0.5 rounded-full text-xs font-medium {class}",
            "{label}"
        }
    }
}
