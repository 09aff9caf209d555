//! Routing of controller events to the audio and UI layers

use crate::audio::AudioSink;
use crate::sim::{GameEvent, GameState, HudSnapshot};

/// How long an encouragement stays on screen (ms)
pub const ENCOURAGEMENT_MS: i32 = 1500;

/// Whatever shows the scoreboard and menus
pub trait UiSink {
    fn update_hud(&mut self, hud: HudSnapshot);
    fn show_encouragement(&mut self, text: &str);
    fn set_paused(&mut self, paused: bool);
    fn set_muted(&mut self, muted: bool);
    fn state_changed(&mut self, state: GameState);
}

/// Hand every drained event to the sink that cares about it
pub fn dispatch_events(
    events: impl IntoIterator<Item = GameEvent>,
    audio: &mut dyn AudioSink,
    ui: &mut dyn UiSink,
) {
    for event in events {
        match event {
            GameEvent::Sound(cue) => audio.play(cue),
            GameEvent::Hud(hud) => ui.update_hud(hud),
            GameEvent::Encouragement(text) => ui.show_encouragement(text),
            GameEvent::PauseChanged(paused) => ui.set_paused(paused),
            GameEvent::MuteChanged(muted) => {
                audio.set_muted(muted);
                ui.set_muted(muted);
            }
            GameEvent::StateChanged(state) => ui.state_changed(state),
        }
    }
}

/// Streak readout; empty until the second success in a row
pub fn streak_label(streak: u32) -> String {
    if streak > 1 {
        format!("{streak}x")
    } else {
        String::new()
    }
}

/// Streak badge highlights from three in a row
pub fn streak_active(streak: u32) -> bool {
    streak >= 3
}

pub fn mute_label(muted: bool) -> &'static str {
    if muted { "🔇" } else { "🔊" }
}

/// Sink for headless runs
#[derive(Debug, Default)]
pub struct LogUi {
    pub last_hud: Option<HudSnapshot>,
}

impl UiSink for LogUi {
    fn update_hud(&mut self, hud: HudSnapshot) {
        if self.last_hud != Some(hud) {
            log::info!(
                "Score {} | Round {} | Streak {}",
                hud.score,
                hud.rounds,
                streak_label(hud.streak)
            );
        }
        self.last_hud = Some(hud);
    }

    fn show_encouragement(&mut self, text: &str) {
        log::info!("{text}");
    }

    fn set_paused(&mut self, paused: bool) {
        log::info!("{}", if paused { "Paused" } else { "Resumed" });
    }

    fn set_muted(&mut self, muted: bool) {
        log::debug!("Muted: {muted}");
    }

    fn state_changed(&mut self, state: GameState) {
        log::debug!("Now {state:?}");
    }
}

#[cfg(target_arch = "wasm32")]
pub use dom::DomHud;

#[cfg(target_arch = "wasm32")]
mod dom {
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlElement};

    use super::{ENCOURAGEMENT_MS, UiSink, mute_label, streak_active, streak_label};
    use crate::sim::{GameState, HudSnapshot};

    const ENCOURAGEMENT_STYLE: &str = "position: fixed; top: 50%; left: 50%; \
        transform: translate(-50%, -50%); font-size: 4em; font-weight: 700; color: white; \
        text-shadow: 0 4px 20px rgba(0, 0, 0, 0.5); pointer-events: none; z-index: 150; \
        animation: encouragementPop 1.5s ease forwards;";

    /// HUD and menus living in the page's DOM
    pub struct DomHud {
        document: Document,
        last_score: u32,
    }

    impl DomHud {
        pub fn new(document: Document) -> Self {
            Self {
                document,
                last_score: 0,
            }
        }

        fn set_text(&self, id: &str, text: &str) {
            if let Some(el) = self.document.get_element_by_id(id) {
                el.set_text_content(Some(text));
            }
        }

        fn set_hidden(&self, id: &str, hidden: bool) {
            if let Some(el) = self.document.get_element_by_id(id) {
                let _ = el.class_list().toggle_with_force("hidden", hidden);
            }
        }

        /// Re-trigger the score pulse animation
        fn pulse_score(&self) {
            let Some(item) = self
                .document
                .get_element_by_id("scoreValue")
                .and_then(|el| el.parent_element())
            else {
                return;
            };
            let _ = item.class_list().add_1("pulse");
            let remove = Closure::once(move || {
                let _ = item.class_list().remove_1("pulse");
            });
            if let Some(window) = web_sys::window() {
                let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
                    remove.as_ref().unchecked_ref(),
                    400,
                );
            }
            remove.forget();
        }
    }

    impl UiSink for DomHud {
        fn update_hud(&mut self, hud: HudSnapshot) {
            self.set_text("scoreValue", &hud.score.to_string());
            if hud.score > self.last_score {
                self.pulse_score();
            }
            self.last_score = hud.score;

            self.set_text("roundsValue", &hud.rounds.to_string());
            self.set_text("streakValue", &streak_label(hud.streak));
            if let Some(item) = self.document.get_element_by_id("streakItem") {
                let _ = item
                    .class_list()
                    .toggle_with_force("active", streak_active(hud.streak));
            }
        }

        fn show_encouragement(&mut self, text: &str) {
            let Some(body) = self.document.body() else {
                return;
            };
            let Ok(el) = self.document.create_element("div") else {
                return;
            };
            el.set_text_content(Some(text));
            let _ = el.set_attribute("style", ENCOURAGEMENT_STYLE);
            if body.append_child(&el).is_err() {
                return;
            }

            let remove = Closure::once(move || el.remove());
            if let Some(window) = web_sys::window() {
                let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
                    remove.as_ref().unchecked_ref(),
                    ENCOURAGEMENT_MS,
                );
            }
            remove.forget();
        }

        fn set_paused(&mut self, paused: bool) {
            self.set_hidden("pauseMenu", !paused);
        }

        fn set_muted(&mut self, muted: bool) {
            self.set_text("muteButton", mute_label(muted));
        }

        fn state_changed(&mut self, state: GameState) {
            self.set_hidden("loadingScreen", state != GameState::Loading);
            self.set_hidden("startScreen", state != GameState::StartScreen);
            let in_game = matches!(
                state,
                GameState::Playing | GameState::Transitioning | GameState::Paused
            );
            self.set_hidden("scoreboard", !in_game);
            if state != GameState::Paused {
                self.set_hidden("pauseMenu", true);
            }
        }
    }

    /// Make the error element visible and hide the canvas
    pub fn show_fatal(document: &Document, canvas_id: &str) {
        if let Some(el) = document
            .get_element_by_id("errorMessage")
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        {
            let _ = el.style().set_property("display", "block");
        }
        if let Some(el) = document
            .get_element_by_id(canvas_id)
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        {
            let _ = el.style().set_property("display", "none");
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use dom::show_fatal;
