//! Collision configuration on disk

use crate::config::{Config, ConfigError, ConfigFormat};
use crate::foundation::math::Vec2;
use crate::physics::{CollisionConfig, DepenetrationConfig};
use crate::spatial::{QuadTreeConfig, StoragePolicy};

fn tuned() -> CollisionConfig {
    CollisionConfig {
        gravity: Vec2::new(0.0, -9.81),
        tree_padding: 4.0,
        depenetration: DepenetrationConfig {
            scale: 0.8,
            skin: 0.05,
            divisor: 1.0,
        },
        quadtree: QuadTreeConfig {
            max_items: 6,
            max_depth: 5,
            policy: StoragePolicy::ParentFallback,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toml_and_ron_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let config = tuned();

        for name in ["collision.toml", "collision.ron"] {
            let path = dir.path().join(name);
            config.save_to_file(&path).unwrap();
            let loaded = CollisionConfig::load_from_file(&path).unwrap();
            assert_eq!(loaded, config, "{name}");
        }
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let text = "tree_padding = 2.5\n\n[quadtree]\nmax_items = 10\n";
        let loaded = CollisionConfig::from_str_as(text, ConfigFormat::Toml).unwrap();

        assert_eq!(loaded.tree_padding, 2.5);
        assert_eq!(loaded.quadtree.max_items, 10);
        assert_eq!(loaded.quadtree.max_depth, QuadTreeConfig::default().max_depth);
        assert_eq!(loaded.depenetration, DepenetrationConfig::default());
        assert_eq!(loaded.gravity, CollisionConfig::default().gravity);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = CollisionConfig::load_or_default(dir.path().join("absent.toml")).unwrap();
        assert_eq!(loaded, CollisionConfig::default());
    }

    #[test]
    fn test_malformed_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.ron");
        std::fs::write(&path, "(gravity: oops").unwrap();

        assert!(matches!(CollisionConfig::load_from_file(&path), Err(ConfigError::Parse(_))));
        assert!(matches!(
            tuned().save_to_file(dir.path().join("collision.yaml")),
            Err(ConfigError::UnsupportedFormat(_))
        ));
    }
}
