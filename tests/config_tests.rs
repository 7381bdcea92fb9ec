//! Layered configuration tests

#[cfg(test)]
mod tests {
    use gesture_world::config::{self, ControllerConfig, ViewerConfig};
    use gesture_world::types::Vec3;
    use parking_lot::{Mutex, MutexGuard};
    use std::path::PathBuf;

    // Every load reads the whole GESTURE__ environment, so tests that depend
    // on it run one at a time.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    /// Sets environment variables for one test and removes them on drop.
    struct EnvVars {
        keys: Vec<&'static str>,
        _lock: MutexGuard<'static, ()>,
    }

    impl EnvVars {
        fn set(vars: &[(&'static str, &str)]) -> Self {
            let lock = ENV_LOCK.lock();
            for (key, value) in vars {
                std::env::set_var(key, value);
            }
            Self {
                keys: vars.iter().map(|(key, _)| *key).collect(),
                _lock: lock,
            }
        }
    }

    impl Drop for EnvVars {
        fn drop(&mut self) {
            for key in &self.keys {
                std::env::remove_var(key);
            }
        }
    }

    fn write_toml(name: &str, body: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("gesture-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(format!("{}.toml", name));
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn defaults_without_file() {
        let _env = EnvVars::set(&[]);
        let cfg: ControllerConfig = config::load(None).unwrap();
        assert_eq!(cfg.bridge_path, PathBuf::from(".commands.json"));
        assert_eq!(cfg.warmup_frames, 5);
        assert_eq!(cfg.boot_scene, "default");
        assert_eq!(cfg.dispatcher.cooldown_secs, 0.5);
        assert_eq!(cfg.classifier.pinch_threshold, 0.06);
    }

    #[test]
    fn file_overrides_selected_keys() {
        let _env = EnvVars::set(&[]);
        let path = write_toml(
            "controller",
            r#"
warmup_frames = 0
boot_scene = "machinery"

[dispatcher]
cooldown_secs = 1.25
"#,
        );
        let cfg: ControllerConfig = config::load(Some(&path)).unwrap();
        assert_eq!(cfg.warmup_frames, 0);
        assert_eq!(cfg.boot_scene, "machinery");
        assert_eq!(cfg.dispatcher.cooldown_secs, 1.25);
        // Untouched keys keep their defaults.
        assert_eq!(cfg.dispatcher.rotate_degrees, 12.0);
        assert_eq!(cfg.classifier.confidence_min, 0.5);
    }

    #[test]
    fn viewer_file_supplies_terrain_bounds() {
        let _env = EnvVars::set(&[]);
        let path = write_toml(
            "viewer",
            r#"
tick_rate_hz = 30.0

[simulation]
move_speed = 4.5

[simulation.terrain]
span = 2

[terrain_bounds]
min = { x = -5.0, y = -5.0, z = 0.0 }
max = { x = 5.0, y = 5.0, z = 1.0 }
"#,
        );
        let cfg: ViewerConfig = config::load(Some(&path)).unwrap();
        assert_eq!(cfg.tick_rate_hz, 30.0);
        assert_eq!(cfg.simulation.move_speed, 4.5);
        assert_eq!(cfg.simulation.terrain.span, 2);
        assert_eq!(cfg.simulation.turn_rate, 90.0);
        let terrain = cfg.terrain_bounds.unwrap();
        assert_eq!(terrain.max, Vec3::new(5.0, 5.0, 1.0));
        assert!(cfg.actor_bounds.is_some());
    }

    #[test]
    fn missing_file_is_an_error() {
        let _env = EnvVars::set(&[]);
        let path = std::env::temp_dir().join("gesture-config-does-not-exist.toml");
        assert!(config::load::<ControllerConfig>(Some(&path)).is_err());
    }

    #[test]
    fn environment_overrides_file() {
        let path = write_toml(
            "env-layer",
            r#"
warmup_frames = 0
boot_scene = "machinery"

[dispatcher]
cooldown_secs = 1.25
"#,
        );
        let _env = EnvVars::set(&[
            ("GESTURE__DISPATCHER__COOLDOWN_SECS", "2.5"),
            ("GESTURE__WARMUP_FRAMES", "9"),
        ]);

        let cfg: ControllerConfig = config::load(Some(&path)).unwrap();
        assert_eq!(cfg.dispatcher.cooldown_secs, 2.5);
        assert_eq!(cfg.warmup_frames, 9);
        // Keys absent from the environment still come from the file.
        assert_eq!(cfg.boot_scene, "machinery");
    }

    #[test]
    fn environment_overrides_defaults_in_nested_sections() {
        let _env = EnvVars::set(&[("GESTURE__SIMULATION__MOVE_SPEED", "5.5")]);
        let cfg: ViewerConfig = config::load(None).unwrap();
        assert_eq!(cfg.simulation.move_speed, 5.5);
        assert_eq!(cfg.simulation.turn_rate, 90.0);
    }
}
