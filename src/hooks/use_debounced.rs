use dioxus::prelude::*;

/// Mirror `value` into a second signal once it has been stable for `delay_ms`.
///
/// Search boxes feed the debounced signal into their fetch effect so a
/// request goes out after the user stops typing rather than on every key.
pub fn use_debounced(value: Signal<String>, delay_ms: u32) -> Signal<String> {
    let mut debounced = use_signal(|| value.peek().clone());
    let mut generation = use_signal(|| 0u64);

    use_effect(move || {
        let current = value.read().clone();
        let ticket = *generation.peek() + 1;
        generation.set(ticket);

        spawn(async move {
            gloo_timers::future::TimeoutFuture::new(delay_ms).await;
            if *generation.peek() == ticket && *debounced.peek() != current {
                debounced.set(current);
            }
        });
    });

    debounced
}
