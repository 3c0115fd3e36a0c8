//! Interactive zone editor
//!
//! Each configured zone appears as a movable, resizable overlay window with
//! two buttons. The user arranges the windows, then saves: the windows'
//! current geometries become the profile's zones and a running daemon is
//! told to reload.

use anyhow::Result;
use tracing::info;

use crate::config::{Config, ZoneConfig};
use crate::constants::{commands, defaults};
use crate::daemon;
use crate::tk::{IdAllocator, TkShell, Widget, WidgetEvent, WindowKind};

/// One editor window and its button identifiers
struct EditorZone {
    window: Widget,
    add_button_id: String,
    save_button_id: String,
}

impl EditorZone {
    fn create(shell: &mut TkShell, ids: &mut IdAllocator) -> EditorZone {
        let mut window = Widget::window(shell, ids);
        window.set_window_kind(shell, WindowKind::Utility);
        window.set_alpha(shell, defaults::zone::BASE_ALPHA);
        window.set_caption(shell, defaults::zone::CAPTION);
        window.set_topmost(shell, true);
        window.set_background(shell, defaults::zone::COLOR);
        window.set_size(shell, defaults::editor::SIZE, defaults::editor::SIZE);

        let add = Widget::button(shell, ids, window.id(), "Add zone");
        add.pack(shell, &[("pady", "10")]);
        let save = Widget::button(shell, ids, window.id(), "Save config");
        save.pack(shell, &[("pady", "10")]);

        let add_button_id = add.id().to_string();
        let save_button_id = save.id().to_string();
        window.attach(add);
        window.attach(save);

        EditorZone {
            window,
            add_button_id,
            save_button_id,
        }
    }
}

pub fn run(profile: &str) -> Result<()> {
    let mut config = Config::load()?;
    config.select_profile(profile);

    let mut shell = TkShell::spawn(commands::TCLSH, &[])?;
    let mut ids = IdAllocator::default();
    let mut editors: Vec<EditorZone> = Vec::new();

    let configured = config.current_zones().to_vec();
    if configured.is_empty() {
        editors.push(EditorZone::create(&mut shell, &mut ids));
    } else {
        for zone in &configured {
            let editor = EditorZone::create(&mut shell, &mut ids);
            editor.window.set_geometry(&mut shell, &zone.rect);
            editors.push(editor);
        }
    }
    info!(profile, zones = editors.len(), "zone editor ready");

    let mut saved = false;
    while !saved && !editors.is_empty() {
        for callback in shell.pump() {
            let mut events = Vec::new();
            for editor in &editors {
                editor.window.handle_callback(&callback, &mut events);
            }
            for event in events {
                match event {
                    WidgetEvent::Clicked { id } => {
                        if editors.iter().any(|editor| editor.add_button_id == id) {
                            editors.push(EditorZone::create(&mut shell, &mut ids));
                        } else if editors.iter().any(|editor| editor.save_button_id == id) {
                            save(&mut config, &mut shell, &editors)?;
                            daemon::notify_reload();
                            saved = true;
                        }
                    }
                    WidgetEvent::Destroyed { id } => {
                        editors.retain(|editor| editor.window.id() != id);
                    }
                }
            }
        }
    }

    shell.close();
    Ok(())
}

/// Persist the editor windows' current geometries as the profile's zones.
fn save(config: &mut Config, shell: &mut TkShell, editors: &[EditorZone]) -> Result<()> {
    let mut zones = Vec::new();
    for editor in editors {
        let rect = editor.window.geometry(shell)?;
        zones.push(ZoneConfig { rect });
    }
    info!(zones = zones.len(), "saving zone layout");
    config.current_profile_mut().zones = zones;
    config.save()
}
