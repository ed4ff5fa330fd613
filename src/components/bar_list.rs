use dioxus::prelude::*;

use crate::utils::format::format_brl;

/// Width of a bar relative to the largest value, in whole percent
pub fn bar_width(value: f64, max: f64) -> u32 {
    if max <= 0.0 || value <= 0.0 {
        return 0;
    }
    ((value / max) * 100.0).round().clamp(1.0, 100.0) as u32
}

/// Horizontal bar chart drawn with plain divs
#[component]
pub fn BarList(
    rows: Vec<(String, f64)>,
    #[props(default = true)] currency: bool,
    #[props(default = "bg-blue-500".to_string())] color: String,
) -> Element {
    let max = rows.iter().map(|(_, v)| *v).fold(0.0_f64, f64::max);

    if rows.is_empty() {
        return rsx! {
            p {
                class: "text-sm text-muted-foreground text-center py-6",
                "Sem dados para o período."
            }
        };
    }

    rsx! {
        ul {
            class: "space-y-2",
            for (label, value) in rows {
                li {
                    key: "{label}",
                    class: "flex items-center gap-3 text-sm",
                    span {
                        class: "w-24 flex-shrink-0 text-muted-foreground truncate",
                        "{label}"
                    }
                    div {
                        class: "flex-1 h-3 bg-muted rounded-full overflow-hidden",
                        div {
                            class: "h-full {color} rounded-full",
                            style: "width: {bar_width(value, max)}%",
                        }
                    }
                    span {
                        class: "w-28 text-right font-medium",
                        if currency {
                            "{format_brl(value)}"
                        } else {
                            "{value:.0}"
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_width_scales_to_max() {
        assert_eq!(bar_width(50.0, 100.0), 50);
        assert_eq!(bar_width(100.0, 100.0), 100);
        assert_eq!(bar_width(0.1, 100.0), 1);
        assert_eq!(bar_width(0.0, 100.0), 0);
        assert_eq!(bar_width(10.0, 0.0), 0);
    }
}
