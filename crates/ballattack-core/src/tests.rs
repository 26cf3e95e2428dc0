#[cfg(test)]
mod tests {
    use glam::DVec3;

    use crate::commands::CombatCommand;
    use crate::enums::*;
    use crate::state::CombatSnapshot;
    use crate::types::{BlastSphere, Rgb, SimTime};

    /// Verify the shared enums round-trip through serde_json.
    #[test]
    fn test_attack_cycle_phase_serde() {
        let variants = vec![AttackCyclePhase::Attack, AttackCyclePhase::Wait];
        for v in variants {
            let json = serde_json::to_string(&v).unwrap();
            let back: AttackCyclePhase = serde_json::from_str(&json).unwrap();
            assert_eq!(v, back);
        }
    }

    #[test]
    fn test_sound_cue_serde() {
        let variants = vec![
            SoundCue::EnemyDestroyed,
            SoundCue::EnemyShellFired,
            SoundCue::CannonFired,
            SoundCue::PlayerImpact,
        ];
        for v in variants {
            let json = serde_json::to_string(&v).unwrap();
            let back: SoundCue = serde_json::from_str(&json).unwrap();
            assert_eq!(v, back);
        }
    }

    #[test]
    fn test_game_phase_serde() {
        let variants = vec![
            GamePhase::Idle,
            GamePhase::Active,
            GamePhase::Paused,
            GamePhase::StageClear,
            GamePhase::GameOver,
        ];
        for v in variants {
            let json = serde_json::to_string(&v).unwrap();
            let back: GamePhase = serde_json::from_str(&json).unwrap();
            assert_eq!(v, back);
        }
    }

    #[test]
    fn test_command_serde() {
        let commands = vec![
            CombatCommand::StartStage {
                enemies: 120,
                parents: 2,
            },
            CombatCommand::SetPlayerPosition {
                position: DVec3::new(0.0, 0.0, 1.8),
            },
            CombatCommand::Fire,
            CombatCommand::TransferEnergy {
                parent_id: 0,
                child_id: 17,
            },
            CombatCommand::Pause,
            CombatCommand::Resume,
        ];
        for c in commands {
            let json = serde_json::to_string(&c).unwrap();
            let _back: CombatCommand = serde_json::from_str(&json).unwrap();
        }
    }

    #[test]
    fn test_sim_time_advance() {
        let mut time = SimTime::default();
        for _ in 0..60 {
            time.advance(1.0 / 60.0);
        }
        assert_eq!(time.tick, 60);
        assert!((time.elapsed_secs - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_rgb_lerp_endpoints() {
        let a = Rgb::new(1.0, 0.0, 0.0);
        let b = Rgb::new(1.0, 1.0, 0.0);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        let mid = a.lerp(b, 0.5);
        assert!((mid.g - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_blast_sphere_serde() {
        let blast = BlastSphere::new(DVec3::new(0.3, 0.4, 0.8), 0.05);
        let json = serde_json::to_string(&blast).unwrap();
        let back: BlastSphere = serde_json::from_str(&json).unwrap();
        assert_eq!(blast, back);
    }

    #[test]
    fn test_empty_snapshot_serde() {
        let snapshot = CombatSnapshot::default();
        let json = serde_json::to_string(&snapshot).unwrap();
        let _back: CombatSnapshot = serde_json::from_str(&json).unwrap();
    }
}
