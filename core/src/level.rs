//! Designer-painted level layouts and their reconciliation against target encounter counts.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;
use ndarray::Array2;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::*;

/// What the designer painted on one cell.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LayoutTag {
    #[default]
    Empty,
    /// Where the player starts; lit with `discover` when the level loads.
    Entry,
    Inactive,
    /// Never mined, not even by padding.
    Safe,
    /// A mine whose event type is drawn from the distribution.
    Mine,
    Combat,
    Chest,
    Dialogue,
    Shrine,
    Sentence,
}

impl LayoutTag {
    pub const fn from_char(c: char) -> Option<Self> {
        Some(match c {
            '.' => Self::Empty,
            '@' => Self::Entry,
            '#' => Self::Inactive,
            's' => Self::Safe,
            '*' => Self::Mine,
            'C' => Self::Combat,
            'T' => Self::Chest,
            'D' => Self::Dialogue,
            'S' => Self::Shrine,
            'E' => Self::Sentence,
            _ => return None,
        })
    }

    pub const fn to_char(self) -> char {
        match self {
            Self::Empty => '.',
            Self::Entry => '@',
            Self::Inactive => '#',
            Self::Safe => 's',
            Self::Mine => '*',
            Self::Combat => 'C',
            Self::Chest => 'T',
            Self::Dialogue => 'D',
            Self::Shrine => 'S',
            Self::Sentence => 'E',
        }
    }

    /// The forced event type of an encounter tag.
    pub const fn event_type(self) -> Option<EventType> {
        match self {
            Self::Combat => Some(EventType::Combat),
            Self::Chest => Some(EventType::Chest),
            Self::Dialogue => Some(EventType::Dialogue),
            Self::Shrine => Some(EventType::Shrine),
            Self::Sentence => Some(EventType::Sentence),
            _ => None,
        }
    }
}

/// Optional target count per encounter type. Types without a target keep what was painted.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncounterTargets {
    pub combat: Option<CellCount>,
    pub chest: Option<CellCount>,
    pub dialogue: Option<CellCount>,
    pub shrine: Option<CellCount>,
    pub sentence: Option<CellCount>,
}

impl EncounterTargets {
    pub const fn get(&self, event_type: EventType) -> Option<CellCount> {
        match event_type {
            EventType::Combat => self.combat,
            EventType::Chest => self.chest,
            EventType::Dialogue => self.dialogue,
            EventType::Shrine => self.shrine,
            EventType::Sentence => self.sentence,
        }
    }
}

/// Text form of a layout: one string per row, one character per cell.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelRows {
    pub rows: Vec<String>,
    #[serde(default)]
    pub targets: EncounterTargets,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "LevelRows", into = "LevelRows")]
pub struct LevelLayout {
    /// Indexed `[x, y]` like the grid.
    pub tags: Array2<LayoutTag>,
    pub targets: EncounterTargets,
}

/// A layout turned into concrete placement inputs for the grid and the event store.
#[derive(Clone, Debug, PartialEq)]
pub struct ReconciledLayout {
    pub mines: Array2<bool>,
    pub forced: BTreeMap<Coord2, EventType>,
    pub inactive: Array2<bool>,
    pub entry: Option<Coord2>,
}

impl LevelLayout {
    pub fn new(tags: Array2<LayoutTag>, targets: EncounterTargets) -> Self {
        Self { tags, targets }
    }

    /// Parses rows top to bottom; row `y`, character `x`.
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, |row| row.as_ref().chars().count());
        let max = usize::from(Coord::MAX);
        if width == 0 || height == 0 || width > max || height > max {
            log::error!("Layout size {}x{} is not playable", width, height);
            return Err(GameError::InvalidBoardShape);
        }

        let mut tags = Array2::default([width, height]);
        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.chars().count() != width {
                log::error!("Layout row {} is not {} cells wide", y, width);
                return Err(GameError::InvalidBoardShape);
            }
            for (x, c) in row.chars().enumerate() {
                tags[[x, y]] = LayoutTag::from_char(c).ok_or_else(|| {
                    log::error!("Unknown layout tag {:?} at ({}, {})", c, x, y);
                    GameError::InvalidBoardShape
                })?;
            }
        }

        Ok(Self::new(tags, EncounterTargets::default()))
    }

    pub fn with_targets(mut self, targets: EncounterTargets) -> Self {
        self.targets = targets;
        self
    }

    pub fn size(&self) -> Coord2 {
        board_size(&self.tags)
    }

    pub fn tag(&self, coords: Coord2) -> LayoutTag {
        self.tags[coords.to_nd_index()]
    }

    fn coords(&self) -> impl Iterator<Item = Coord2> + use<> {
        board_coords(self.size())
    }

    /// Brings every targeted encounter type to its target count.
    ///
    /// Surplus painted cells are dropped at random and become empty ground. Missing ones are
    /// padded onto random `Empty` cells; when there are not enough, the count is clamped.
    pub fn reconcile<R: Rng + ?Sized>(&self, rng: &mut R) -> ReconciledLayout {
        let dim = self.tags.dim();
        let mut mines = Array2::from_elem(dim, false);
        let mut inactive = Array2::from_elem(dim, false);
        let mut forced = BTreeMap::new();
        let mut entry = None;

        for coords in self.coords() {
            let index = coords.to_nd_index();
            match self.tag(coords) {
                LayoutTag::Inactive => inactive[index] = true,
                LayoutTag::Mine => mines[index] = true,
                LayoutTag::Entry if entry.is_none() => entry = Some(coords),
                LayoutTag::Entry => log::warn!("Extra entry at {:?} ignored", coords),
                tag => {
                    if let Some(event_type) = tag.event_type() {
                        mines[index] = true;
                        forced.insert(coords, event_type);
                    }
                }
            }
        }

        for event_type in EventType::ALL {
            let Some(target) = self.targets.get(event_type) else {
                continue;
            };
            let target = usize::from(target);
            let mut painted: Vec<Coord2> = forced
                .iter()
                .filter(|&(_, &forced_type)| forced_type == event_type)
                .map(|(&coords, _)| coords)
                .collect();

            if painted.len() > target {
                painted.shuffle(rng);
                for coords in &painted[target..] {
                    forced.remove(coords);
                    mines[coords.to_nd_index()] = false;
                }
                log::debug!(
                    "Truncated {:?} from {} to {}",
                    event_type,
                    painted.len(),
                    target
                );
            } else if painted.len() < target {
                let missing = target - painted.len();
                let mut eligible: Vec<Coord2> = self
                    .coords()
                    .filter(|&coords| {
                        self.tag(coords) == LayoutTag::Empty && !mines[coords.to_nd_index()]
                    })
                    .collect();
                if eligible.len() < missing {
                    log::warn!(
                        "Only {} free cells to pad {:?} up to {}, clamping",
                        eligible.len(),
                        event_type,
                        target
                    );
                }
                eligible.shuffle(rng);
                for coords in eligible.into_iter().take(missing) {
                    mines[coords.to_nd_index()] = true;
                    forced.insert(coords, event_type);
                }
            }
        }

        ReconciledLayout {
            mines,
            forced,
            inactive,
            entry,
        }
    }
}

impl TryFrom<LevelRows> for LevelLayout {
    type Error = GameError;

    fn try_from(level: LevelRows) -> Result<Self> {
        Ok(Self::from_rows(&level.rows)?.with_targets(level.targets))
    }
}

impl From<LevelLayout> for LevelRows {
    fn from(layout: LevelLayout) -> Self {
        let (width, height) = layout.size();
        let rows: Vec<String> = (0..height)
            .map(|y| (0..width).map(|x| layout.tag((x, y)).to_char()).collect())
            .collect();
        Self {
            rows,
            targets: layout.targets,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn count_forced(reconciled: &ReconciledLayout, event_type: EventType) -> usize {
        reconciled
            .forced
            .values()
            .filter(|&&forced| forced == event_type)
            .count()
    }

    #[test]
    fn rows_are_read_as_x_by_y() {
        let layout = LevelLayout::from_rows(&["@.C", "#*E"]).unwrap();

        assert_eq!(layout.size(), (3, 2));
        assert_eq!(layout.tag((0, 0)), LayoutTag::Entry);
        assert_eq!(layout.tag((2, 0)), LayoutTag::Combat);
        assert_eq!(layout.tag((0, 1)), LayoutTag::Inactive);
        assert_eq!(layout.tag((2, 1)), LayoutTag::Sentence);
    }

    #[test]
    fn malformed_rows_are_rejected() {
        assert_eq!(
            LevelLayout::from_rows(&["...", ".."]),
            Err(GameError::InvalidBoardShape)
        );
        assert_eq!(
            LevelLayout::from_rows(&["..?"]),
            Err(GameError::InvalidBoardShape)
        );
        assert_eq!(
            LevelLayout::from_rows::<&str>(&[]),
            Err(GameError::InvalidBoardShape)
        );
    }

    #[test]
    fn untargeted_tags_are_kept_as_painted() {
        let mut rng = SmallRng::seed_from_u64(1);
        let layout = LevelLayout::from_rows(&["@.C.", "#*.T"]).unwrap();

        let reconciled = layout.reconcile(&mut rng);

        assert_eq!(reconciled.entry, Some((0, 0)));
        assert!(reconciled.inactive[[0, 1]]);
        assert!(reconciled.mines[[1, 1]]);
        assert!(!reconciled.forced.contains_key(&(1, 1)));
        assert_eq!(reconciled.forced.get(&(2, 0)), Some(&EventType::Combat));
        assert_eq!(reconciled.forced.get(&(3, 1)), Some(&EventType::Chest));
        assert_eq!(reconciled.mines.iter().filter(|&&mine| mine).count(), 3);
    }

    #[test]
    fn surplus_is_truncated_to_target() {
        let mut rng = SmallRng::seed_from_u64(2);
        let layout = LevelLayout::from_rows(&["CCCCC", "@...."])
            .unwrap()
            .with_targets(EncounterTargets {
                combat: Some(2),
                ..Default::default()
            });

        let reconciled = layout.reconcile(&mut rng);

        assert_eq!(count_forced(&reconciled, EventType::Combat), 2);
        assert_eq!(reconciled.mines.iter().filter(|&&mine| mine).count(), 2);
    }

    #[test]
    fn padding_only_uses_empty_cells() {
        let mut rng = SmallRng::seed_from_u64(3);
        let layout = LevelLayout::from_rows(&["@ss.", "##.s", "*..s"])
            .unwrap()
            .with_targets(EncounterTargets {
                chest: Some(4),
                ..Default::default()
            });

        let reconciled = layout.reconcile(&mut rng);

        let mut padded: Vec<Coord2> = reconciled.forced.keys().copied().collect();
        padded.sort();
        assert_eq!(padded, [(1, 2), (2, 1), (2, 2), (3, 0)]);
        assert!(padded.iter().all(|&coords| layout.tag(coords) == LayoutTag::Empty));
        assert!(reconciled.mines[[0, 2]]);
    }

    #[test]
    fn padding_shortfall_is_clamped() {
        let mut rng = SmallRng::seed_from_u64(4);
        let layout = LevelLayout::from_rows(&["@..", "sss"])
            .unwrap()
            .with_targets(EncounterTargets {
                shrine: Some(5),
                ..Default::default()
            });

        let reconciled = layout.reconcile(&mut rng);

        assert_eq!(count_forced(&reconciled, EventType::Shrine), 2);
        assert!(!reconciled.mines[[0, 0]]);
    }

    #[test]
    fn reconciliation_is_reproducible() {
        let layout = LevelLayout::from_rows(&["@.......", "........", "CCCC...."])
            .unwrap()
            .with_targets(EncounterTargets {
                combat: Some(2),
                dialogue: Some(3),
                ..Default::default()
            });

        let first = layout.reconcile(&mut SmallRng::seed_from_u64(9));
        let second = layout.reconcile(&mut SmallRng::seed_from_u64(9));

        assert_eq!(first, second);
        assert_eq!(count_forced(&first, EventType::Dialogue), 3);
    }

    #[test]
    fn parses_level_json() {
        let layout: LevelLayout = serde_json::from_str(
            r#"{ "rows": ["@.T", "..*"], "targets": { "chest": 1, "combat": null } }"#,
        )
        .unwrap();

        assert_eq!(layout.size(), (3, 2));
        assert_eq!(layout.targets.chest, Some(1));
        assert_eq!(layout.tag((2, 1)), LayoutTag::Mine);

        let rows = LevelRows::from(layout);
        assert_eq!(rows.rows, ["@.T", "..*"]);
    }
}
