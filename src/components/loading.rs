use dioxus::prelude::*;

/// Skeleton rows shown while a list loads
#[component]
pub fn ListSkeleton(#[props(default = 5)] rows: usize) -> Element {
    rsx! {
        div {
            class: "animate-pulse",
            role: "status",
            aria_live: "polite",
            aria_busy: "true",

            span {
                class: "sr-only",
                "Carregando..."
            }

            for _ in 0..rows {
                div {
                    class: "flex items-center gap-4 px-4 py-4 border-b border-border",
                    div {
                        class: "w-10 h-10 rounded-full bg-muted flex-shrink-0"
                    }
                    div {
                        class: "flex-1 space-y-2",
                        div {
                            class: "h-4 bg-muted rounded w-1/3"
                        }
                        div {
                            class: "h-3 bg-muted rounded w-1/2"
                        }
                    }
                    div {
                        class: "h-8 w-20 bg-muted rounded-lg"
                    }
                }
            }
        }
    }
}

#[component]
pub fn Spinner(#[props(default = "Carregando...".to_string())] label: String) -> Element {
    rsx! {
        div {
            class: "flex items-center justify-center gap-3 py-8 text-muted-foreground",
            role: "status",
            div {
                class: "w-5 h-5 border-2 border-primary border-t-transparent rounded-full animate-spin"
            }
            span { "{label}" }
        }
    }
}
