use dioxus::prelude::*;

use crate::routes::Route;

#[component]
pub fn NotFound(segments: Vec<String>) -> Element {
    let path = segments.join("/");
    rsx! {
        div {
            class: "min-h-screen flex flex-col items-center justify-center text-center p-4",
            div {
                class: "text-6xl mb-4",
                "🧭"
            }
            h3 {
                class: "text-xl font-semibold mb-2",
                "Página não encontrada"
            }
            p {
                class: "text-muted-foreground mb-4",
                "/{path}"
            }
            Link {
                to: Route::Dashboard {},
                class: "px-4 py-2 bg-primary text-primary-foreground rounded-lg hover:bg-primary/90 transition",
                "Voltar ao início"
            }
        }
    }
}
