//! The game orchestrator: owns the grid, the event store, the player and the run log, and routes
//! primary/secondary interactions and encounter choices between them.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Grid size for random mode; a layout brings its own.
    pub size: Coord2,
    pub starting_hp: i32,
    pub player_force: u32,
    pub vision_radius: u8,
    /// HP paid for each primary interaction on an unrevealed safe cell.
    pub reveal_cost: u32,
    /// HP lost for accusing a cell that holds no mine.
    pub false_flag_penalty: u32,
    pub buff_divisor: u32,
    pub distribution: EventDistribution,
    /// Event types that do not need to be resolved to win.
    pub victory_exempt: Vec<EventType>,
    pub seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            size: (16, 16),
            starting_hp: 30,
            player_force: 3,
            vision_radius: 2,
            reveal_cost: 0,
            false_flag_penalty: 5,
            buff_divisor: 2,
            distribution: EventDistribution::default(),
            victory_exempt: vec![EventType::Sentence],
            seed: 0,
        }
    }
}

impl GameConfig {
    pub fn counts_toward_victory(&self, event_type: EventType) -> bool {
        !self.victory_exempt.contains(&event_type)
    }
}

/// Where the mines of a new game come from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum MineSource {
    /// Placed on the first primary interaction, away from the clicked cell.
    Random {
        mines: CellCount,
        /// Centre of the initial light; defaults to the middle of the grid.
        bootstrap: Option<Coord2>,
    },
    Layout(LevelLayout),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    WaitingForFirstClick,
    Playing,
    Won,
    Lost,
}

impl GameState {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// Notifications for the presentation layer, drained with [`Game::drain_events`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    HpChanged { from: i32, to: i32 },
    MinesRemainingChanged(usize),
    LightChanged(Vec<Coord2>),
    GridReady,
    GameOver { won: bool },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EncounterPhase {
    AwaitingChoice,
    AwaitingAcknowledge,
    Done,
}

/// Everything a committed resolution changed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolutionOutcome {
    pub coords: Coord2,
    pub event_type: EventType,
    pub kind: InteractionKind,
    pub result: ResolutionResult,
    /// The reward actually granted; `None` when the player did not survive.
    pub reward: Reward,
    pub reward_text: String,
    pub hp_before: i32,
    pub hp_after: i32,
}

/// The open encounter dialog.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Encounter {
    pub coords: Coord2,
    pub kind: InteractionKind,
    pub phase: EncounterPhase,
    pub descriptor: InteractionDescriptor,
    pub resolution: Option<ResolutionOutcome>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PrimaryOutcome {
    /// Inactive cell.
    Ignored,
    CannotAfford { cost: u32, hp: i32 },
    /// Paying the reveal cost took the last HP; the cell was left untouched.
    Exhausted { cost: u32 },
    Encounter(InteractionDescriptor),
    Discovered { revealed: CellCount, lit: usize },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SecondaryOutcome {
    /// Inactive cell, or no mines placed yet.
    Ignored,
    Flag(FlagOutcome),
    FalseAccusation { penalty: u32, revealed: CellCount },
    /// A hidden mine was accused; it resolved at once and awaits acknowledgement.
    Penalty(ResolutionOutcome),
}

#[derive(Clone, Debug)]
pub struct Game {
    config: GameConfig,
    content: ContentPools,
    source: MineSource,
    grid: Grid,
    events: MineEventStore,
    run_log: RunLog,
    player: Player,
    state: GameState,
    encounter: Option<Encounter>,
    notifications: Vec<GameEvent>,
    rng: SmallRng,
}

impl Game {
    pub fn new(config: GameConfig, content: ContentPools, source: MineSource) -> Result<Self> {
        let mut game = Self {
            grid: Grid::new(config.size),
            events: MineEventStore::new(),
            run_log: RunLog::new(),
            player: Player::new(config.starting_hp, config.vision_radius),
            state: GameState::WaitingForFirstClick,
            encounter: None,
            notifications: Vec::new(),
            rng: SmallRng::seed_from_u64(config.seed),
            config,
            content,
            source,
        };
        game.setup()?;
        Ok(game)
    }

    /// Starts over with a fresh grid, event store, player and run log. The RNG keeps running,
    /// so a random-mode restart gets a new mine field.
    pub fn restart(&mut self) -> Result<()> {
        log::debug!("Restarting game");
        self.setup()
    }

    fn setup(&mut self) -> Result<()> {
        let size = match &self.source {
            MineSource::Random { .. } => self.config.size,
            MineSource::Layout(layout) => layout.size(),
        };
        if size.0 == 0 || size.1 == 0 {
            log::error!("Grid size {:?} is not playable", size);
            return Err(GameError::InvalidBoardShape);
        }

        self.grid = Grid::new(size);
        self.events.clear();
        self.run_log.clear();
        self.player = Player::new(self.config.starting_hp, self.config.vision_radius);
        self.state = GameState::WaitingForFirstClick;
        self.encounter = None;
        self.notifications.clear();

        let reconciled = match &self.source {
            MineSource::Random { .. } => None,
            MineSource::Layout(layout) => Some(layout.reconcile(&mut self.rng)),
        };
        match reconciled {
            Some(reconciled) => self.build_from_layout(reconciled)?,
            None => self.bootstrap_light()?,
        }

        self.refresh_state();
        Ok(())
    }

    fn bootstrap_light(&mut self) -> Result<()> {
        let (width, height) = self.grid.size();
        let center = match &self.source {
            MineSource::Random {
                bootstrap: Some(center),
                ..
            } => *center,
            _ => (width / 2, height / 2),
        };
        let lit = self
            .grid
            .expand_visibility(center, self.player.vision_radius)?;
        self.notify_light(lit);
        Ok(())
    }

    fn build_from_layout(&mut self, reconciled: ReconciledLayout) -> Result<()> {
        for coords in self.grid.coords() {
            if reconciled.inactive[coords.to_nd_index()] {
                self.grid.set_active(coords, false)?;
            }
        }
        place_mines_from_layout(&mut self.grid, &reconciled.mines)?;
        self.populate(&reconciled.forced);

        match reconciled.entry {
            Some(entry) => {
                let lit = self.grid.discover(entry, self.player.vision_radius)?;
                self.notify_light(lit);
            }
            None => log::warn!("Level has no entry cell"),
        }
        Ok(())
    }

    fn place_random_mines(&mut self, first_click: Coord2) -> Result<()> {
        let MineSource::Random { mines, .. } = self.source else {
            return Ok(());
        };
        place_mines_random(&mut self.grid, mines, first_click, &mut self.rng)?;
        self.populate(&BTreeMap::new());
        Ok(())
    }

    /// Adjacency, events, and the switch to `Playing` once mines are down.
    fn populate(&mut self, forced: &BTreeMap<Coord2, EventType>) {
        self.grid.compute_adjacency();
        self.events.assign_events(
            &self.grid,
            &self.config.distribution,
            &self.content,
            forced,
            &mut self.rng,
        );
        self.state = GameState::Playing;
        log::debug!(
            "Grid ready: {} mines, {} inactive cells",
            self.grid.mine_count(),
            self.grid.inactive_count()
        );
        self.notifications.push(GameEvent::GridReady);
        self.notify_mines_remaining();
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn event_store(&self) -> &MineEventStore {
        &self.events
    }

    pub fn run_log(&self) -> &RunLog {
        &self.run_log
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn encounter(&self) -> Option<&Encounter> {
        self.encounter.as_ref()
    }

    /// Unresolved events that still count toward victory.
    pub fn mines_remaining(&self) -> usize {
        self.events
            .unresolved_count(|event_type| self.config.counts_toward_victory(event_type))
    }

    pub fn interaction(&self, coords: Coord2) -> Option<InteractionDescriptor> {
        self.events.get(coords).map(MineEvent::interaction)
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        core::mem::take(&mut self.notifications)
    }

    fn ensure_accepting_input(&self) -> Result<()> {
        if self.state.is_finished() {
            Err(GameError::AlreadyEnded)
        } else if self.encounter.is_some() {
            Err(GameError::EncounterPending)
        } else {
            Ok(())
        }
    }

    /// Reveal: opens the encounter on an unresolved mine, otherwise runs `discover` from the cell.
    ///
    /// The reveal cost is due before either happens, for any target that would open an
    /// encounter or reveal a hidden cell.
    pub fn primary(&mut self, coords: Coord2) -> Result<PrimaryOutcome> {
        self.ensure_accepting_input()?;
        let coords = self.grid.validate_coords(coords)?;
        if !self.grid[coords].is_active() {
            return Ok(PrimaryOutcome::Ignored);
        }
        if self.state == GameState::WaitingForFirstClick {
            self.place_random_mines(coords)?;
        }

        let cell = self.grid[coords];
        let opens_encounter = cell.has_mine()
            && self
                .events
                .get(coords)
                .is_some_and(|event| !event.is_resolved());

        let cost = self.config.reveal_cost;
        if cost > 0 && (opens_encounter || !(cell.has_mine() || cell.is_revealed())) {
            let hp = self.player.hp;
            if i64::from(hp) < i64::from(cost) {
                log::debug!("Cannot afford reveal at {:?}: {} < {}", coords, hp, cost);
                return Ok(PrimaryOutcome::CannotAfford { cost, hp });
            }
            self.change_hp(-saturating_i32(cost));
            if self.refresh_state().is_finished() {
                return Ok(PrimaryOutcome::Exhausted { cost });
            }
        }

        if opens_encounter {
            return self.open_encounter(coords).map(PrimaryOutcome::Encounter);
        }

        let before = self.grid.revealed_count();
        let lit = self.grid.discover(coords, self.player.vision_radius)?;
        let outcome = PrimaryOutcome::Discovered {
            revealed: self.grid.revealed_count() - before,
            lit: lit.len(),
        };
        self.notify_light(lit);
        self.refresh_state();
        Ok(outcome)
    }

    /// Flag or accuse: a hidden mine resolves as a penalty encounter, an unrevealed safe cell
    /// costs `false_flag_penalty`, and anything else toggles the flag.
    pub fn secondary(&mut self, coords: Coord2) -> Result<SecondaryOutcome> {
        self.ensure_accepting_input()?;
        let coords = self.grid.validate_coords(coords)?;
        let cell = self.grid[coords];
        if self.state == GameState::WaitingForFirstClick || !cell.is_active() {
            return Ok(SecondaryOutcome::Ignored);
        }

        if cell.has_mine() {
            let hidden = self
                .events
                .get(coords)
                .is_some_and(|event| event.state() == EventState::Hidden);
            if hidden {
                return self.penalty_encounter(coords).map(SecondaryOutcome::Penalty);
            }
        } else if !cell.is_revealed() {
            let penalty = self.config.false_flag_penalty;
            log::debug!("False accusation at {:?}, -{} HP", coords, penalty);
            let before = self.grid.revealed_count();
            let lit = self.grid.discover(coords, self.player.vision_radius)?;
            let revealed = self.grid.revealed_count() - before;
            self.notify_light(lit);
            self.change_hp(-saturating_i32(penalty));
            self.refresh_state();
            return Ok(SecondaryOutcome::FalseAccusation { penalty, revealed });
        }

        self.grid.toggle_flag(coords).map(SecondaryOutcome::Flag)
    }

    fn open_encounter(&mut self, coords: Coord2) -> Result<InteractionDescriptor> {
        self.events.reveal(coords)?;
        let descriptor = self
            .events
            .get(coords)
            .ok_or(GameError::NotAMine)?
            .interaction();
        log::debug!("Opened {:?} encounter at {:?}", descriptor.event_type, coords);
        self.encounter = Some(Encounter {
            coords,
            kind: InteractionKind::Normal,
            phase: EncounterPhase::AwaitingChoice,
            descriptor: descriptor.clone(),
            resolution: None,
        });
        Ok(descriptor)
    }

    fn penalty_encounter(&mut self, coords: Coord2) -> Result<ResolutionOutcome> {
        self.events.reveal(coords)?;
        let outcome = self.commit(coords, InteractionKind::Penalty, None)?;
        let descriptor = self
            .events
            .get(coords)
            .ok_or(GameError::NotAMine)?
            .interaction();
        self.encounter = Some(Encounter {
            coords,
            kind: InteractionKind::Penalty,
            phase: EncounterPhase::AwaitingAcknowledge,
            descriptor,
            resolution: Some(outcome.clone()),
        });
        Ok(outcome)
    }

    /// Commits `choice` for the open encounter.
    ///
    /// A choice the encounter does not offer fails with [`GameError::InvalidChoice`] and leaves
    /// the encounter open.
    pub fn choose(&mut self, choice: PlayerChoice) -> Result<ResolutionOutcome> {
        let encounter = self.encounter.as_ref().ok_or(GameError::NoEncounter)?;
        if encounter.phase != EncounterPhase::AwaitingChoice {
            return Err(GameError::NoEncounter);
        }
        if !encounter.descriptor.offers(choice) {
            log::warn!(
                "{:?} is not offered by the encounter at {:?}",
                choice,
                encounter.coords
            );
            return Err(GameError::InvalidChoice);
        }

        let (coords, kind) = (encounter.coords, encounter.kind);
        let outcome = self.commit(coords, kind, Some(choice))?;
        let descriptor = self.interaction(coords);
        if let Some(encounter) = self.encounter.as_mut() {
            encounter.phase = EncounterPhase::AwaitingAcknowledge;
            encounter.resolution = Some(outcome.clone());
            if let Some(descriptor) = descriptor {
                encounter.descriptor = descriptor;
            }
        }
        Ok(outcome)
    }

    /// Closes the encounter. Before a choice nothing is committed and the event stays revealed;
    /// after one this is the same as [`Game::acknowledge`].
    pub fn cancel_encounter(&mut self) -> Result<()> {
        let encounter = self.encounter.take().ok_or(GameError::NoEncounter)?;
        log::debug!(
            "Closed encounter at {:?} in {:?}",
            encounter.coords,
            encounter.phase
        );
        Ok(())
    }

    /// Dismisses a resolved encounter and returns it in its final `Done` phase.
    pub fn acknowledge(&mut self) -> Result<Encounter> {
        match self.encounter.take() {
            Some(mut encounter) if encounter.phase == EncounterPhase::AwaitingAcknowledge => {
                encounter.phase = EncounterPhase::Done;
                Ok(encounter)
            }
            Some(encounter) => {
                self.encounter = Some(encounter);
                Err(GameError::EncounterPending)
            }
            None => Err(GameError::NoEncounter),
        }
    }

    /// Resolves the event at `coords` and applies the result to the player, the store and the log.
    fn commit(
        &mut self,
        coords: Coord2,
        kind: InteractionKind,
        choice: Option<PlayerChoice>,
    ) -> Result<ResolutionOutcome> {
        let context = CombatContext {
            player_force: self.config.player_force,
            buffed: self.player.is_buffed(),
            buff_divisor: self.config.buff_divisor,
        };
        let hp_before = self.player.hp;
        let event = self.events.get(coords).ok_or(GameError::NotAMine)?;
        if event.is_resolved() {
            log::warn!("Event at {:?} is already resolved", coords);
            return Err(GameError::AlreadyResolved);
        }
        let event_type = event.event_type();
        // Penalty resolution ignores the choice.
        let result = resolve(
            event,
            choice.unwrap_or(PlayerChoice::Fight),
            kind,
            hp_before,
            &context,
        )?;

        self.change_hp(result.hp_delta);
        if event_type == EventType::Combat {
            self.player.consume_buff();
        }

        let (reward, reward_text) = if result.player_died {
            (Reward::None, String::new())
        } else {
            let hp = self.player.hp;
            let text = apply_reward(result.reward, &mut self.player);
            if self.player.hp != hp {
                self.notifications.push(GameEvent::HpChanged {
                    from: hp,
                    to: self.player.hp,
                });
            }
            (result.reward, text)
        };

        self.events.record_resolution(
            coords,
            EventOutcome {
                choice,
                kind,
                hp_delta: result.hp_delta,
                reward,
                result_text: result.result_text.clone(),
            },
        )?;
        let hp_after = self.player.hp;
        self.run_log.record(RunEvent {
            index: 0,
            event_type,
            coords,
            choice,
            kind,
            hp_before,
            hp_after,
            reward,
        });
        log::debug!(
            "Resolved {:?} at {:?} ({:?}): HP {} -> {}",
            event_type,
            coords,
            kind,
            hp_before,
            hp_after
        );

        self.notify_mines_remaining();
        self.refresh_state();

        Ok(ResolutionOutcome {
            coords,
            event_type,
            kind,
            result,
            reward,
            reward_text,
            hp_before,
            hp_after,
        })
    }

    /// Re-derives Won/Lost from HP and the event store. Finished games stay finished.
    pub fn refresh_state(&mut self) -> GameState {
        if self.state.is_finished() {
            return self.state;
        }
        if self.player.is_dead() {
            self.finish(false);
        } else if self.state == GameState::Playing && self.mines_remaining() == 0 {
            self.finish(true);
        }
        self.state
    }

    fn finish(&mut self, won: bool) {
        self.state = if won { GameState::Won } else { GameState::Lost };
        log::debug!("Game over: {:?}", self.state);
        self.notifications.push(GameEvent::GameOver { won });
    }

    fn change_hp(&mut self, delta: i32) {
        if delta == 0 {
            return;
        }
        let from = self.player.hp;
        self.player.adjust_hp(delta);
        self.notifications.push(GameEvent::HpChanged {
            from,
            to: self.player.hp,
        });
    }

    fn notify_light(&mut self, lit: Vec<Coord2>) {
        if !lit.is_empty() {
            self.notifications.push(GameEvent::LightChanged(lit));
        }
    }

    fn notify_mines_remaining(&mut self) {
        let remaining = self.mines_remaining();
        self.notifications
            .push(GameEvent::MinesRemainingChanged(remaining));
    }
}

fn saturating_i32(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}
