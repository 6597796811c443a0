//! Flippa Slap entry point
//!
//! Handles platform-specific initialization and wires DOM events to the game.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{
        Document, Element, Event, HtmlElement, HtmlImageElement, HtmlInputElement, KeyboardEvent,
        MouseEvent,
    };

    use flippa_slap::audio::AudioManager;
    use flippa_slap::feedback::{
        FLOATING_TEXT, ImageSink, ImageState, MARKER_GLYPH, MarkerId, MarkerSink, Point,
        Scheduled, SoundSink, image_asset,
    };
    use flippa_slap::leaderboard::LeaderboardView;
    use flippa_slap::platform::{BrowserClock, LocalStore};
    use flippa_slap::{
        Game, ImageSet, PlaybackError, RoundSummary, SessionError, Settings, SoundVariant,
    };

    /// DOM-backed feedback sinks
    struct DomFeedback {
        document: Document,
        character: Option<HtmlImageElement>,
        frame: Option<HtmlElement>,
        slippers: Option<Element>,
        floating_text: Option<HtmlElement>,
        markers: HashMap<MarkerId, Element>,
        audio: AudioManager,
    }

    impl DomFeedback {
        fn new(document: Document) -> Self {
            Self {
                character: by_id(&document, "character"),
                frame: by_id(&document, "gameFrame"),
                slippers: document.get_element_by_id("slippersContainer"),
                floating_text: by_id(&document, "floatingText"),
                markers: HashMap::new(),
                audio: AudioManager::new(),
                document,
            }
        }
    }

    impl ImageSink for DomFeedback {
        fn show_image(&mut self, set: ImageSet, state: ImageState) {
            if let Some(img) = &self.character {
                img.set_src(image_asset(set, state));
            }
        }
    }

    impl SoundSink for DomFeedback {
        fn play_sound(&mut self, variant: SoundVariant, volume: f32) -> Result<(), PlaybackError> {
            self.audio.play_sound(variant, volume)
        }
    }

    impl MarkerSink for DomFeedback {
        fn spawn_marker(&mut self, id: MarkerId, at: Point) {
            let Some(container) = &self.slippers else {
                return;
            };
            let Some(slipper) = self
                .document
                .create_element("div")
                .ok()
                .and_then(|el| el.dyn_into::<HtmlElement>().ok())
            else {
                return;
            };
            slipper.set_class_name("slipper");
            slipper.set_text_content(Some(MARKER_GLYPH));
            let style = slipper.style();
            let _ = style.set_property("left", &format!("{}px", at.x));
            let _ = style.set_property("top", &format!("{}px", at.y));
            let _ = style.set_property("transform", "translate(-50%, -50%)");
            if container.append_child(&slipper).is_ok() {
                self.markers.insert(id, slipper.into());
            }
        }

        fn remove_marker(&mut self, id: MarkerId) {
            if let Some(el) = self.markers.remove(&id) {
                el.remove();
            }
        }

        fn set_shake(&mut self, on: bool) {
            let Some(frame) = &self.frame else { return };
            let classes = frame.class_list();
            let _ = classes.remove_1("shake");
            if on {
                // Force reflow so the animation restarts
                let _ = frame.offset_width();
                let _ = classes.add_1("shake");
            }
        }

        fn pop_text(&mut self, at: Point) {
            let Some(text) = &self.floating_text else {
                return;
            };
            text.set_text_content(Some(FLOATING_TEXT));
            let style = text.style();
            let _ = style.set_property("left", &format!("{}px", at.x));
            let _ = style.set_property("top", &format!("{}px", at.y));
            let classes = text.class_list();
            let _ = classes.remove_1("pop");
            let _ = text.offset_width();
            let _ = classes.add_1("pop");
        }
    }

    /// Everything event handlers share
    struct App {
        game: Game<LocalStore, BrowserClock>,
        sinks: DomFeedback,
    }

    type Shared = Rc<RefCell<App>>;

    fn by_id<T: JsCast>(document: &Document, id: &str) -> Option<T> {
        document
            .get_element_by_id(id)
            .and_then(|el| el.dyn_into::<T>().ok())
    }

    fn document() -> Option<Document> {
        web_sys::window()?.document()
    }

    fn set_display(id: &str, display: &str) {
        if let Some(el) = document().and_then(|d| by_id::<HtmlElement>(&d, id)) {
            let _ = el.style().set_property("display", display);
        }
    }

    fn set_text(id: &str, text: &str) {
        if let Some(el) = document().and_then(|d| d.get_element_by_id(id)) {
            el.set_text_content(Some(text));
        }
    }

    fn focus_nickname_input() {
        if let Some(input) = document().and_then(|d| by_id::<HtmlInputElement>(&d, "nicknameInput")) {
            let _ = input.focus();
        }
    }

    /// Bind a click handler to an element, if the page has it
    fn on_click(id: &str, app: &Shared, handler: fn(&Shared)) {
        let Some(el) = document().and_then(|d| d.get_element_by_id(id)) else {
            log::debug!("No #{} on page", id);
            return;
        };
        let app = app.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| handler(&app));
        let _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Reset round UI after a (new) round starts
    fn show_fresh_round(app: &Shared) {
        let mut a = app.borrow_mut();
        let App { game, sinks } = &mut *a;
        set_text("score", "0");
        set_text("gameStatus", "");
        set_display("roundOverModal", "none");
        set_display("leaderboardModal", "none");
        sinks.show_image(game.session().image_set, ImageState::Idle);
    }

    fn start_game(app: &Shared) {
        let nickname = document()
            .and_then(|d| by_id::<HtmlInputElement>(&d, "nicknameInput"))
            .map(|input| input.value())
            .unwrap_or_default();

        let result = app.borrow_mut().game.start(&nickname);
        match result {
            Ok(()) => {
                set_display("nicknameModal", "none");
                set_display("mainGame", "block");
                show_fresh_round(app);
            }
            Err(SessionError::EmptyNickname) => {
                if let Some(window) = web_sys::window() {
                    let _ = window.alert_with_message("Please enter a nickname!");
                }
                focus_nickname_input();
            }
            Err(e) => log::warn!("Start failed: {}", e),
        }
    }

    fn schedule(app: &Shared, scheduled: Scheduled) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let app = app.clone();
        let closure = Closure::once(move || {
            let mut a = app.borrow_mut();
            let App { game, sinks } = &mut *a;
            game.run_deferred(scheduled.task, sinks);
        });
        let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            scheduled.delay_ms as i32,
        );
        closure.forget();
    }

    fn on_frame_click(app: &Shared, event: &MouseEvent) {
        let at = document()
            .and_then(|d| d.get_element_by_id("gameFrame"))
            .map(|frame| {
                let rect = frame.get_bounding_client_rect();
                Point::new(
                    event.client_x() as f64 - rect.left(),
                    event.client_y() as f64 - rect.top(),
                )
            })
            .unwrap_or_default();

        let scheduled = {
            let mut a = app.borrow_mut();
            let App { game, sinks } = &mut *a;
            let Some(feedback) = game.tap(at) else {
                return;
            };
            set_text("score", &feedback.outcome.score.to_string());
            feedback.apply(sinks);
            feedback.scheduled
        };

        for s in scheduled {
            schedule(app, s);
        }
    }

    fn new_round(app: &Shared) {
        let result = app.borrow_mut().game.new_round();
        match result {
            Ok(Some(RoundSummary { score, rank })) => {
                log::info!("Round saved: {} (rank {:?})", score, rank);
            }
            Ok(None) => {}
            Err(e) => {
                log::warn!("New round failed: {}", e);
                return;
            }
        }
        show_fresh_round(app);
    }

    fn end_round(app: &Shared) {
        let result = app.borrow_mut().game.end_round();
        match result {
            Ok(RoundSummary { score, rank }) => {
                set_text("roundOverScore", &score.to_string());
                let rank_text = match rank {
                    Some(rank) => format!("#{}", rank),
                    None => "Unranked".to_string(),
                };
                set_text("roundOverRank", &rank_text);
                set_display("roundOverModal", "flex");
            }
            Err(e) => log::debug!("End round ignored: {}", e),
        }
    }

    fn play_again(app: &Shared) {
        let result = app.borrow_mut().game.play_again();
        match result {
            Ok(()) => show_fresh_round(app),
            Err(e) => log::warn!("Play again failed: {}", e),
        }
    }

    fn show_leaderboard(app: &Shared) {
        let Some(document) = document() else { return };
        let Some(list) = document.get_element_by_id("leaderboardList") else {
            return;
        };
        list.set_text_content(None);

        match app.borrow().game.leaderboard_view() {
            LeaderboardView::Empty { message } => {
                if let Ok(p) = document.create_element("p") {
                    p.set_text_content(Some(message));
                    let _ = list.append_child(&p);
                }
            }
            LeaderboardView::Ranked(rows) => {
                for row in rows {
                    let Ok(entry) = leaderboard_row(&document, &row) else {
                        continue;
                    };
                    let _ = list.append_child(&entry);
                }
            }
        }

        set_display("leaderboardModal", "flex");
    }

    /// Build one leaderboard row; text content only, so nicknames need no escaping
    fn leaderboard_row(
        document: &Document,
        row: &flippa_slap::leaderboard::RankedEntry,
    ) -> Result<Element, JsValue> {
        let entry = document.create_element("div")?;
        let class = match row.podium {
            Some(podium) => format!("leaderboard-entry {}", podium.css_class()),
            None => "leaderboard-entry".to_string(),
        };
        entry.set_class_name(&class);

        let cell = |class: &str, text: &str| -> Result<Element, JsValue> {
            let el = document.create_element("div")?;
            el.set_class_name(class);
            el.set_text_content(Some(text));
            Ok(el)
        };

        entry.append_child(&cell("leaderboard-rank", &format!("#{}", row.rank))?)?;
        entry.append_child(&cell("leaderboard-name", &row.nickname)?)?;
        let right = document.create_element("div")?;
        right.append_child(&cell("leaderboard-score", &row.score.to_string())?)?;
        right.append_child(&cell("leaderboard-date", &row.date)?)?;
        entry.append_child(&right)?;
        Ok(entry)
    }

    fn hide_leaderboard(_app: &Shared) {
        set_display("leaderboardModal", "none");
    }

    fn reset_leaderboard(app: &Shared) {
        let mut ask = |prompt: &str| {
            web_sys::window()
                .and_then(|w| w.confirm_with_message(prompt).ok())
                .unwrap_or(false)
        };
        let cleared = app.borrow_mut().game.reset_leaderboard(&mut ask);
        if cleared {
            show_leaderboard(app);
        }
    }

    /// Bring the settings controls in line with the stored settings
    fn sync_settings_controls(settings: &Settings) {
        set_text("muteBtn", if settings.muted { "Unmute" } else { "Mute" });
        set_text(
            "motionBtn",
            if settings.reduced_motion {
                "Shake: Off"
            } else {
                "Shake: On"
            },
        );
        if let Some(slider) = document().and_then(|d| by_id::<HtmlInputElement>(&d, "volumeSlider")) {
            slider.set_value(&format!("{}", (settings.volume * 100.0).round()));
        }
    }

    fn toggle_mute(app: &Shared) {
        let mut a = app.borrow_mut();
        let muted = a.game.toggle_mute();
        log::info!("Sound {}", if muted { "muted" } else { "on" });
        sync_settings_controls(a.game.settings());
    }

    fn toggle_motion(app: &Shared) {
        let mut a = app.borrow_mut();
        a.game.toggle_reduced_motion();
        sync_settings_controls(a.game.settings());
    }

    /// Volume slider runs 0-100
    fn on_volume_input(app: &Shared, slider: &HtmlInputElement) {
        let Ok(percent) = slider.value().parse::<f32>() else {
            return;
        };
        let mut a = app.borrow_mut();
        a.game.set_volume(percent / 100.0);
        sync_settings_controls(a.game.settings());
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Flippa Slap starting...");

        let Some(document) = document() else {
            log::error!("No document - cannot start");
            return;
        };

        let app: Shared = Rc::new(RefCell::new(App {
            game: Game::new(LocalStore::open(), BrowserClock::new()),
            sinks: DomFeedback::new(document.clone()),
        }));

        // Nickname: button or Enter
        on_click("startGameBtn", &app, start_game);
        if let Some(input) = by_id::<HtmlInputElement>(&document, "nicknameInput") {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if event.key() == "Enter" {
                    start_game(&app);
                }
            });
            let _ = input.add_event_listener_with_callback("keypress", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Tap surface
        if let Some(frame) = document.get_element_by_id("gameFrame") {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                on_frame_click(&app, &event);
            });
            let _ = frame.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        on_click("newRoundBtn", &app, new_round);
        on_click("endRoundBtn", &app, end_round);
        on_click("playAgainBtn", &app, play_again);
        on_click("viewLeaderboardBtn", &app, show_leaderboard);
        on_click("closeLeaderboardBtn", &app, hide_leaderboard);
        on_click("resetLeaderboardBtn", &app, reset_leaderboard);

        // Settings
        on_click("muteBtn", &app, toggle_mute);
        on_click("motionBtn", &app, toggle_motion);
        if let Some(slider) = by_id::<HtmlInputElement>(&document, "volumeSlider") {
            let app = app.clone();
            let target = slider.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: Event| {
                on_volume_input(&app, &target);
            });
            let _ = slider.add_event_listener_with_callback("input", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        sync_settings_controls(app.borrow().game.settings());

        focus_nickname_input();

        log::info!("Flippa Slap running!");
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Flippa Slap (native) starting...");
    log::info!("Native mode runs a scripted round - run with `trunk serve` for the web version");

    demo::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless scripted session against the real game core
#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use flippa_slap::feedback::{
        ImageSink, ImageState, MarkerId, MarkerSink, Point, SoundSink, image_asset,
    };
    use flippa_slap::leaderboard::LeaderboardView;
    use flippa_slap::platform::{Clock, ManualClock, MemoryStore, SystemClock, TimerQueue};
    use flippa_slap::{Game, ImageSet, PlaybackError, SoundVariant};

    /// Sinks that log what the page would show
    struct LogSinks;

    impl ImageSink for LogSinks {
        fn show_image(&mut self, set: ImageSet, state: ImageState) {
            log::debug!("image -> {}", image_asset(set, state));
        }
    }

    impl SoundSink for LogSinks {
        fn play_sound(&mut self, variant: SoundVariant, _volume: f32) -> Result<(), PlaybackError> {
            log::info!("sound -> {}", variant.asset());
            Ok(())
        }
    }

    impl MarkerSink for LogSinks {
        fn spawn_marker(&mut self, id: MarkerId, at: Point) {
            log::debug!("marker {} at ({}, {})", id, at.x, at.y);
        }

        fn remove_marker(&mut self, id: MarkerId) {
            log::debug!("marker {} removed", id);
        }

        fn set_shake(&mut self, on: bool) {
            log::debug!("shake {}", on);
        }

        fn pop_text(&mut self, _at: Point) {}
    }

    /// (player, gaps between taps in ms)
    const ROUNDS: &[(&str, &[u32])] = &[
        ("ana", &[400, 350, 500, 320, 450]),
        ("bo", &[100, 90, 120, 80, 110, 95, 400, 85, 70, 60, 90, 100]),
        ("cy", &[600, 200, 250, 700, 150, 50, 120]),
    ];

    pub fn run() {
        let clock = ManualClock::new(SystemClock::new().local_date());
        let mut game = Game::new(MemoryStore::new(), clock);
        let mut sinks = LogSinks;
        let mut timers = TimerQueue::new();

        for (nickname, gaps) in ROUNDS {
            if let Err(e) = game.start(nickname) {
                log::error!("{}", e);
                continue;
            }
            for gap in gaps.iter() {
                game.clock().advance(*gap as f64);
                let now = game.clock().now_ms();
                for task in timers.drain_due(now) {
                    game.run_deferred(task, &mut sinks);
                }
                let Some(feedback) = game.tap(Point::new(160.0, 120.0)) else {
                    continue;
                };
                feedback.apply(&mut sinks);
                for s in &feedback.scheduled {
                    timers.schedule(now, s.delay_ms, s.task);
                }
            }

            game.clock().advance(1000.0);
            for task in timers.drain_due(game.clock().now_ms()) {
                game.run_deferred(task, &mut sinks);
            }

            match game.end_round() {
                Ok(summary) => println!(
                    "{:>4}: {:>4} points, rank {}",
                    nickname,
                    summary.score,
                    summary
                        .rank
                        .map(|r| format!("#{}", r))
                        .unwrap_or_else(|| "unranked".to_string())
                ),
                Err(e) => log::error!("{}", e),
            }
        }

        if let Some(best) = game.leaderboard().top_score() {
            println!("\nBest score: {}", best);
        }
        println!("\nLeaderboard");
        match game.leaderboard_view() {
            LeaderboardView::Empty { message } => println!("  {}", message),
            LeaderboardView::Ranked(rows) => {
                for row in rows {
                    println!("  #{:<2} {:<8} {:>5}  {}", row.rank, row.nickname, row.score, row.date);
                }
            }
        }
    }
}
