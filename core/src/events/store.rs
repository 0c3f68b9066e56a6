use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::*;

/// Event overlay keyed by mine coordinate; grid cells never embed event data.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MineEventStore {
    events: BTreeMap<Coord2, MineEvent>,
}

impl MineEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates one hidden event per mine cell of `grid`, replacing any previous assignment.
    ///
    /// A forced type wins for its coordinate; every other mine draws its type from
    /// `distribution`. Templates come from `pools`, unique until a pool runs dry.
    pub fn assign_events<R: Rng + ?Sized>(
        &mut self,
        grid: &Grid,
        distribution: &EventDistribution,
        pools: &ContentPools,
        forced: &BTreeMap<Coord2, EventType>,
        rng: &mut R,
    ) -> usize {
        self.events.clear();

        for (&coords, event_type) in forced {
            if !grid.in_bounds(coords) || !grid[coords].has_mine() {
                log::warn!(
                    "Forced {:?} event at {:?} has no mine, ignoring",
                    event_type,
                    coords
                );
            }
        }

        let assignments: Vec<(Coord2, EventType)> = grid
            .mine_coords()
            .map(|coords| {
                let event_type = match forced.get(&coords) {
                    Some(&event_type) => event_type,
                    None => distribution.draw(rng),
                };
                (coords, event_type)
            })
            .collect();

        let mut decks = Decks::new(pools, rng);
        for (coords, event_type) in assignments {
            let params = decks.draw(event_type, pools, rng);
            self.events.insert(coords, MineEvent::new(coords, params));
        }

        log::debug!("Assigned {} mine events", self.events.len());
        self.events.len()
    }

    pub fn insert(&mut self, event: MineEvent) {
        self.events.insert(event.coords(), event);
    }

    pub fn get(&self, coords: Coord2) -> Option<&MineEvent> {
        self.events.get(&coords)
    }

    pub fn contains(&self, coords: Coord2) -> bool {
        self.events.contains_key(&coords)
    }

    pub fn iter(&self) -> impl Iterator<Item = &MineEvent> {
        self.events.values()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Hidden -> Revealed. Returns whether the state changed.
    pub fn reveal(&mut self, coords: Coord2) -> Result<bool> {
        let event = self.events.get_mut(&coords).ok_or(GameError::NotAMine)?;
        Ok(event.mark_revealed())
    }

    /// Moves the event to Resolved. Returns `false` (and changes nothing) when it already was.
    pub fn record_resolution(&mut self, coords: Coord2, outcome: EventOutcome) -> Result<bool> {
        let event = self.events.get_mut(&coords).ok_or(GameError::NotAMine)?;
        Ok(event.mark_resolved(outcome))
    }

    /// Unresolved events whose type satisfies `counts`.
    pub fn unresolved_count(&self, counts: impl Fn(EventType) -> bool) -> usize {
        self.events
            .values()
            .filter(|event| !event.is_resolved() && counts(event.event_type()))
            .count()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

/// One content deck per event type, shuffled up front.
struct Decks<'a> {
    combat: ContentDeck<'a, CombatParams>,
    chest: ContentDeck<'a, ChestParams>,
    dialogue: ContentDeck<'a, DialogueParams>,
    shrine: ContentDeck<'a, ShrineParams>,
    sentence: ContentDeck<'a, SentenceParams>,
}

impl<'a> Decks<'a> {
    fn new<R: Rng + ?Sized>(pools: &'a ContentPools, rng: &mut R) -> Self {
        Self {
            combat: ContentDeck::new(&pools.combat, rng),
            chest: ContentDeck::new(&pools.chest, rng),
            dialogue: ContentDeck::new(&pools.dialogue, rng),
            shrine: ContentDeck::new(&pools.shrine, rng),
            sentence: ContentDeck::new(&pools.sentence, rng),
        }
    }

    fn draw<R: Rng + ?Sized>(
        &mut self,
        event_type: EventType,
        pools: &ContentPools,
        rng: &mut R,
    ) -> EventParams {
        match event_type {
            EventType::Combat => EventParams::Combat(
                self.combat
                    .draw(rng)
                    .cloned()
                    .unwrap_or_else(|| placeholder(event_type, CombatParams::placeholder)),
            ),
            EventType::Chest => EventParams::Chest(
                self.chest
                    .draw(rng)
                    .cloned()
                    .unwrap_or_else(|| placeholder(event_type, ChestParams::placeholder)),
            ),
            EventType::Dialogue => EventParams::Dialogue(match self.dialogue.draw(rng) {
                Some(template) if !template.options.is_empty() => with_speaker(template, pools),
                Some(template) => {
                    log::warn!("Dialogue {:?} has no options, using placeholder", template.text);
                    DialogueParams::placeholder()
                }
                None => placeholder(event_type, DialogueParams::placeholder),
            }),
            EventType::Shrine => EventParams::Shrine(
                self.shrine
                    .draw(rng)
                    .cloned()
                    .unwrap_or_else(|| placeholder(event_type, ShrineParams::placeholder)),
            ),
            EventType::Sentence => EventParams::Sentence(
                self.sentence
                    .draw(rng)
                    .cloned()
                    .unwrap_or_else(|| placeholder(event_type, SentenceParams::placeholder)),
            ),
        }
    }
}

fn placeholder<T>(event_type: EventType, make: fn() -> T) -> T {
    log::warn!("No {:?} content available, using placeholder", event_type);
    make()
}

fn with_speaker(template: &DialogueParams, pools: &ContentPools) -> DialogueParams {
    let mut params = template.clone();
    params.speaker = match pools.character_name(&template.character_id) {
        Some(name) => String::from(name),
        None => {
            log::warn!(
                "Unknown character {:?}, using placeholder speaker",
                template.character_id
            );
            String::from(PLACEHOLDER_SPEAKER)
        }
    };
    params
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    use smallvec::smallvec;

    fn mined_grid(mines: &[Coord2]) -> Grid {
        let mut grid = Grid::new((6, 6));
        for &coords in mines {
            grid.set_mine(coords, true);
        }
        grid
    }

    fn pools() -> ContentPools {
        ContentPools {
            characters: vec![Character {
                id: String::from("hermit"),
                name: String::from("The Hermit"),
            }],
            combat: vec![
                CombatParams {
                    name: String::from("Rat"),
                    force: 2,
                    ..Default::default()
                },
                CombatParams {
                    name: String::from("Wolf"),
                    force: 5,
                    ..Default::default()
                },
            ],
            dialogue: vec![DialogueParams {
                character_id: String::from("ghost"),
                speaker: String::new(),
                text: String::from("Boo"),
                options: smallvec![DialogueOption::default(), DialogueOption::default()],
            }],
            ..Default::default()
        }
    }

    #[test]
    fn one_hidden_event_per_mine() {
        let mut rng = SmallRng::seed_from_u64(1);
        let grid = mined_grid(&[(0, 0), (2, 3), (5, 5)]);
        let mut store = MineEventStore::new();

        let assigned = store.assign_events(
            &grid,
            &EventDistribution::default(),
            &pools(),
            &BTreeMap::new(),
            &mut rng,
        );

        assert_eq!(assigned, 3);
        for coords in [(0, 0), (2, 3), (5, 5)] {
            assert_eq!(store.get(coords).unwrap().state(), EventState::Hidden);
        }
        assert!(store.get((1, 1)).is_none());
    }

    #[test]
    fn forced_types_win_over_distribution() {
        let mut rng = SmallRng::seed_from_u64(2);
        let grid = mined_grid(&[(1, 1), (4, 4)]);
        let forced = BTreeMap::from([((1, 1), EventType::Sentence), ((3, 3), EventType::Chest)]);
        let distribution = EventDistribution {
            combat: 1,
            chest: 0,
            dialogue: 0,
            shrine: 0,
        };
        let mut store = MineEventStore::new();

        store.assign_events(&grid, &distribution, &pools(), &forced, &mut rng);

        assert_eq!(store.get((1, 1)).unwrap().event_type(), EventType::Sentence);
        assert_eq!(store.get((4, 4)).unwrap().event_type(), EventType::Combat);
        assert!(!store.contains((3, 3)));
    }

    #[test]
    fn combat_pool_is_used_without_repeats_first() {
        let mut rng = SmallRng::seed_from_u64(3);
        let grid = mined_grid(&[(0, 0), (5, 0)]);
        let distribution = EventDistribution {
            combat: 1,
            chest: 0,
            dialogue: 0,
            shrine: 0,
        };
        let mut store = MineEventStore::new();

        store.assign_events(&grid, &distribution, &pools(), &BTreeMap::new(), &mut rng);

        let mut names: Vec<_> = store
            .iter()
            .map(|event| match event.params() {
                EventParams::Combat(params) => params.name.clone(),
                other => panic!("unexpected params {:?}", other),
            })
            .collect();
        names.sort();
        assert_eq!(names, vec![String::from("Rat"), String::from("Wolf")]);
    }

    #[test]
    fn missing_content_falls_back_to_placeholders() {
        let mut rng = SmallRng::seed_from_u64(4);
        let grid = mined_grid(&[(0, 0), (2, 2)]);
        let forced = BTreeMap::from([((0, 0), EventType::Shrine), ((2, 2), EventType::Dialogue)]);
        let mut store = MineEventStore::new();

        store.assign_events(
            &grid,
            &EventDistribution::default(),
            &pools(),
            &forced,
            &mut rng,
        );

        assert_eq!(
            store.get((0, 0)).unwrap().params(),
            &EventParams::Shrine(ShrineParams::placeholder())
        );
        match store.get((2, 2)).unwrap().params() {
            EventParams::Dialogue(params) => assert_eq!(params.speaker, PLACEHOLDER_SPEAKER),
            other => panic!("unexpected params {:?}", other),
        }
    }

    #[test]
    fn state_only_moves_forward() {
        let mut store = MineEventStore::new();
        store.insert(MineEvent::new(
            (1, 2),
            EventParams::Chest(ChestParams::placeholder()),
        ));
        let outcome = |hp_delta| EventOutcome {
            choice: Some(PlayerChoice::Open),
            kind: InteractionKind::Normal,
            hp_delta,
            reward: Reward::None,
            result_text: String::new(),
        };

        assert!(store.reveal((1, 2)).unwrap());
        assert!(!store.reveal((1, 2)).unwrap());
        assert!(store.record_resolution((1, 2), outcome(-3)).unwrap());
        assert!(!store.record_resolution((1, 2), outcome(-9)).unwrap());
        assert!(!store.reveal((1, 2)).unwrap());

        let event = store.get((1, 2)).unwrap();
        assert_eq!(event.state(), EventState::Resolved);
        assert_eq!(event.outcome().unwrap().hp_delta, -3);
        assert_eq!(store.reveal((0, 0)), Err(GameError::NotAMine));
    }

    #[test]
    fn unresolved_count_honours_exemptions() {
        let mut store = MineEventStore::new();
        store.insert(MineEvent::new((0, 0), EventParams::Combat(CombatParams::placeholder())));
        store.insert(MineEvent::new(
            (1, 0),
            EventParams::Sentence(SentenceParams::placeholder()),
        ));

        assert_eq!(store.unresolved_count(|_| true), 2);
        assert_eq!(store.unresolved_count(|t| t != EventType::Sentence), 1);
    }
}
