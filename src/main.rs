//! Pixel Peak - headless native driver
//!
//! Plays a scripted session against the recording renderer and the logging
//! audio sink. A windowed backend drives `Game` the same way.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use glam::Vec2;
    use pixel_peak::audio::LogAudio;
    use pixel_peak::consts::{SIM_DT, TITLE};
    use pixel_peak::platform::{Action, ScriptedInput};
    use pixel_peak::renderer::DrawList;
    use pixel_peak::ui::MenuButton;
    use pixel_peak::{Game, Settings};

    env_logger::init();
    log::info!("{} (native) starting...", TITLE);

    let settings = Settings::load();
    let mut game = Game::new(&settings);

    // Walk right, hop over the first enemy, give up and leave via the menu
    let mut input = ScriptedInput::new()
        .click(1, MenuButton::Start.rect().center())
        .hold(Action::MoveRight, 2..240)
        .hold(Action::Jump, 60..64)
        .hold(Action::Jump, 150..154)
        .hold(Action::Cancel, 600..602)
        .click(660, MenuButton::Exit.rect().center());
    let frame_cap = input.last_frame() + 60;

    let mut renderer = DrawList::with_all_assets();
    let mut audio = LogAudio;
    let mut phase = game.phase();
    let mut uploaded_bytes = 0usize;

    while !game.is_exited() && input.frame() < frame_cap {
        game.frame(&mut input, SIM_DT);

        renderer.begin_frame();
        game.draw(&mut renderer);
        // Stand-in for the GPU upload of flat-colored rectangles
        let instances = renderer.instance_bytes();
        log::trace!(
            "Frame {}: {} commands, {} instance bytes",
            input.frame(),
            renderer.commands().len(),
            instances.len()
        );
        uploaded_bytes += instances.len();
        game.flush_audio(&mut audio);

        if game.phase() != phase {
            log::info!("Frame {}: {:?} -> {:?}", input.frame(), phase, game.phase());
            phase = game.phase();
        }
        input.advance();
    }

    if let Some(world) = game.world() {
        let Vec2 { x, y } = world.player.rect.midbottom();
        log::info!("Player ended at ({x:.1}, {y:.1}) after {:.2}s", world.time);
    }
    log::info!(
        "{} frames, final phase {:?}, {} rect instance bytes uploaded",
        input.frame(),
        game.phase(),
        uploaded_bytes
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // No browser backend; the library still builds for wasm32
}
