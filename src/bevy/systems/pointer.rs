//! Pointer snapshot system
//!
//! The Tauri side overwrites the shared pointer cell on every pointer-move
//! event (last-write-wins). Once per tick, before any animation runs, the
//! current value is copied into the `PointerSnapshot` resource so every
//! system reads the same pointer state for the whole tick.

use bevy::prelude::*;

use crate::bevy::resources::{PointerInputRes, PointerSnapshot};

pub fn sample_pointer(
    pointer_input: Option<Res<PointerInputRes>>,
    mut snapshot: ResMut<PointerSnapshot>,
) {
    let Some(input) = pointer_input else {
        return;
    };
    let Ok(guard) = input.0 .0.lock() else {
        return;
    };
    snapshot.0 = *guard;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tauri_bridge::shared_state::{PointerState, SharedPointerState};

    #[test]
    fn snapshot_tracks_latest_write() {
        let shared = SharedPointerState::default();
        let mut app = App::new();
        app.insert_resource(PointerInputRes(shared.clone()));
        app.init_resource::<PointerSnapshot>();
        app.add_systems(Update, sample_pointer);

        *shared.0.lock().unwrap() = PointerState { x: 0.25, y: -0.4 };
        app.update();
        assert_eq!(
            app.world().resource::<PointerSnapshot>().0,
            PointerState { x: 0.25, y: -0.4 }
        );

        // Two writes between ticks: only the second survives
        *shared.0.lock().unwrap() = PointerState { x: -0.1, y: 0.1 };
        *shared.0.lock().unwrap() = PointerState { x: 0.5, y: 0.5 };
        app.update();
        assert_eq!(
            app.world().resource::<PointerSnapshot>().0,
            PointerState { x: 0.5, y: 0.5 }
        );
    }

    #[test]
    fn missing_input_resource_is_tolerated() {
        let mut app = App::new();
        app.init_resource::<PointerSnapshot>();
        app.add_systems(Update, sample_pointer);
        app.update();
        assert_eq!(app.world().resource::<PointerSnapshot>().0, PointerState::default());
    }
}
