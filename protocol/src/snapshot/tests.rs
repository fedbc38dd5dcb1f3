#[cfg(test)]
mod tests {
    use crate::{Choice, Slot, Snapshot, StatusCode, WirePhase};

    const BATTLE: &str = r#"{
        "meta": {
            "players": {"p1": {"id": "alice", "name": "Alice"}, "p2": {"id": "bob"}},
            "turn": 2,
            "phase": "choosing",
            "version": 2,
            "rng": 1234,
            "winnerId": null
        },
        "public": {
            "p1": {
                "active": {"species": "pikachu", "level": 50, "hp": {"cur": 80, "max": 95}, "status": null,
                           "boosts": {"atk": 0, "def": 0, "spa": 0, "spd": 0, "spe": 0, "acc": 0, "eva": 0}},
                "benchPublic": []
            },
            "p2": {
                "active": {"species": "onix", "level": 50, "hp": {"cur": 60, "max": 110}, "status": "BRN",
                           "boosts": {"atk": 0, "def": 1, "spa": 0, "spd": 0, "spe": 0, "acc": 0, "eva": 0}},
                "benchPublic": [{"species": "geodude", "fainted": true, "revealedMoves": []}],
                "sideConditions": {"stealthrock": {"layers": 1}}
            },
            "field": {"weather": "sandstorm", "weatherTurns": 3}
        },
        "private": {
            "alice": {"team": [{"pokemon": {"name": "pikachu"}, "currentHp": 80, "maxHp": 95}]},
            "bob": {"team": [{"pokemon": {"name": "onix"}}, {"pokemon": {"name": "geodude"}, "currentHp": 0}]}
        },
        "turns": {
            "1": {"choices": {}, "resolution": {"log": ["Turn 1 begins!"], "winner": null}},
            "2": {"choices": {"alice": {"action": "move", "payload": {"moveId": "thunderbolt"}, "clientVersion": 2}}}
        }
    }"#;

    #[test]
    fn test_parse_battle_document() {
        let snapshot = Snapshot::from_json(BATTLE).unwrap();
        let meta = snapshot.meta.as_ref().unwrap();

        assert_eq!(meta.phase, WirePhase::Choosing);
        assert_eq!(snapshot.version(), 2);
        assert_eq!(snapshot.current_turn(), 2);
        assert_eq!(meta.players.slot_of("bob"), Some(Slot::P2));

        let public = snapshot.public.as_ref().unwrap();
        let p2 = public.side(Slot::P2).unwrap();
        assert_eq!(p2.active.status, Some(StatusCode::Brn));
        assert!(p2.bench_public[0].fainted);
        assert_eq!(p2.side_conditions["stealthrock"].layers, 1);
        assert_eq!(public.field.weather.as_deref(), Some("sandstorm"));

        assert_eq!(snapshot.private["bob"].team.len(), 2);
        assert!(snapshot.turns[&1].is_resolved());
    }

    #[test]
    fn test_current_choices() {
        let snapshot = Snapshot::from_json(BATTLE).unwrap();
        let choices = snapshot.current_choices().unwrap();

        assert_eq!(choices.len(), 1);
        assert_eq!(choices["alice"], {
            let mut c = Choice::use_move("thunderbolt");
            c.client_version = 2;
            c
        });
    }

    #[test]
    fn test_json_round_trip() {
        let snapshot = Snapshot::from_json(BATTLE).unwrap();
        let encoded = snapshot.to_json().unwrap();
        assert_eq!(Snapshot::from_json(&encoded).unwrap(), snapshot);
    }

    #[test]
    fn test_partial_document() {
        let snapshot = Snapshot::from_json(r#"{"meta": {"turn": 1}}"#).unwrap();
        assert!(snapshot.public.is_none());
        assert!(snapshot.private.is_empty());
        assert!(snapshot.current_choices().is_none());
    }

    #[test]
    fn test_invalid_document() {
        assert!(Snapshot::from_json(r#"{"meta": {"phase": "sleeping"}}"#).is_err());
        assert!(Snapshot::from_json("not json").is_err());
    }

    #[test]
    fn test_turn_entry_is_lazy() {
        let mut snapshot = Snapshot::default();
        assert!(snapshot.turns.is_empty());
        snapshot.turn_entry(4);
        assert!(snapshot.turns.contains_key(&4));
        assert!(snapshot.turns[&4].choices.is_empty());
    }
}
