//! Interactive play session: menu, turn loop, replay and shutdown.

use crate::ai::{MoveNetwork, TrainingConfig, choose_move};
use crate::console::Console;
use crate::error::{GameError, SessionError};
use crate::games::tictactoe::{Board, Mark, Outcome, Position, evaluate};
use crate::leaderboard::GameResult;
use crate::ports::{Backends, HistorySink, LeaderboardStore};
use crate::provider::PredictorProvider;
use crate::records::TrainingRecord;
use crate::ui::{render_board, render_leaderboard, start_screen};
use derive_getters::Getters;
use tracing::{debug, info, instrument, warn};

/// Where the turn loop currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for a valid index from the human.
    AwaitingHumanMove,
    /// A move by `mover` was just applied.
    Evaluating {
        /// Who placed the last mark.
        mover: Mark,
    },
    /// The AI is to move.
    AwaitingAiMove,
    /// The round finished with a terminal outcome.
    RoundEnd(Outcome),
    /// The session is over.
    Terminated(Termination),
}

/// Why a session stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The player chose to exit from the menu or declined a replay.
    Declined,
    /// The AI had to move but no predictor could be obtained.
    NoPredictorAvailable,
    /// Input ended before the player chose to stop.
    InputClosed,
}

/// What happened during a session.
#[derive(Debug, Clone, Getters)]
pub struct SessionReport {
    nickname: String,
    results: Vec<GameResult>,
    records: Vec<TrainingRecord>,
    termination: Termination,
    #[getter(copy)]
    persisted: bool,
}

impl SessionReport {
    /// Number of rounds played to completion.
    pub fn rounds(&self) -> usize {
        self.results.len()
    }
}

const MOVE_PROMPT: &str = "Your move (0-8): ";
const MENU_PROMPT: &str = "Do you want to play game, exit or look at the leadersboard? \n\
                           (Y - game, L - leadersboard, any other - exit): ";
const REPLAY_PROMPT: &str = "\nPlay again?\n(Y - if yes, any other - if no): ";

fn affirmative(answer: Option<&str>) -> bool {
    answer.is_some_and(|a| a.trim().eq_ignore_ascii_case("y"))
}

/// One player's session against the predictor.
pub struct Session<C: Console> {
    console: C,
    history: Box<dyn HistorySink>,
    leaderboard: Box<dyn LeaderboardStore>,
    provider: PredictorProvider,
    retrain_on_exit: bool,
    nickname: String,
    board: Board,
    stored_history: Vec<TrainingRecord>,
    records: Vec<TrainingRecord>,
    results: Vec<GameResult>,
    predictor: Option<MoveNetwork>,
    persisted: bool,
}

impl<C: Console> Session<C> {
    /// Creates a session reading from `console` and recording into `backends`.
    #[instrument(skip_all)]
    pub fn new(console: C, backends: Backends, training: TrainingConfig) -> Self {
        info!("Creating session");
        let Backends {
            history,
            leaderboard,
            predictors,
        } = backends;
        Self {
            console,
            history,
            leaderboard,
            provider: PredictorProvider::new(predictors, training),
            retrain_on_exit: false,
            nickname: String::new(),
            board: Board::new(),
            stored_history: Vec::new(),
            records: Vec::new(),
            results: Vec::new(),
            predictor: None,
            persisted: false,
        }
    }

    /// Retrain on stored plus session records before the final persist.
    pub fn with_retrain_on_exit(mut self, retrain: bool) -> Self {
        self.retrain_on_exit = retrain;
        self
    }

    /// The console, e.g. to inspect a scripted transcript afterwards.
    pub fn console(&self) -> &C {
        &self.console
    }

    /// Runs the menu and, if chosen, the game until the player stops.
    ///
    /// # Errors
    ///
    /// [`SessionError::Console`] if the terminal cannot be read or written.
    #[instrument(skip(self))]
    pub async fn run(&mut self) -> Result<SessionReport, SessionError> {
        self.console.say("\nTic Tac Toe with Ai\n").await?;

        let termination = match self.menu().await? {
            Some(true) => self.play().await?,
            Some(false) => {
                self.console.say("\nGame over.\n").await?;
                Termination::Declined
            }
            None => Termination::InputClosed,
        };

        info!(rounds = self.results.len(), ?termination, "Session finished");
        Ok(self.report(termination))
    }

    /// Asks for the nickname and the first choice. `Some(true)` means play.
    async fn menu(&mut self) -> Result<Option<bool>, SessionError> {
        loop {
            let Some(name) = self
                .console
                .prompt("Please enter your nickname (it must be unique): ")
                .await?
            else {
                return Ok(None);
            };
            let name = name.trim();
            if !name.is_empty() {
                self.nickname = name.to_string();
                break;
            }
        }
        info!(nickname = %self.nickname, "Player joined");

        let Some(choice) = self.console.prompt(MENU_PROMPT).await? else {
            return Ok(None);
        };

        if choice.trim().eq_ignore_ascii_case("l") {
            self.show_leaderboard().await?;
            let answer = self
                .console
                .prompt("Do you want to play game or exit? \n(Y - game, any other - exit): ")
                .await?;
            if answer.is_none() {
                return Ok(None);
            }
            return Ok(Some(affirmative(answer.as_deref())));
        }
        Ok(Some(affirmative(Some(choice.as_str()))))
    }

    /// Plays rounds until the player declines, then shuts down.
    #[instrument(skip(self), fields(nickname = %self.nickname))]
    async fn play(&mut self) -> Result<Termination, SessionError> {
        self.console.say("\nGame starting.\n").await?;
        self.console.say(&start_screen()).await?;

        self.stored_history = match self.history.read_history().await {
            Ok(records) => records,
            Err(e) => {
                warn!(error = %e, "Could not read history, continuing without it");
                Vec::new()
            }
        };
        self.predictor = self.provider.obtain(&self.stored_history).await;
        debug!(has_predictor = self.predictor.is_some(), "Predictor ready");

        self.board.reset();
        let mut phase = Phase::AwaitingHumanMove;
        let termination = loop {
            phase = match phase {
                Phase::AwaitingHumanMove => self.human_turn().await?,
                Phase::Evaluating { mover } => self.evaluate(mover).await?,
                Phase::AwaitingAiMove => self.ai_turn().await?,
                Phase::RoundEnd(outcome) => self.round_end(outcome).await?,
                Phase::Terminated(termination) => break termination,
            };
        };

        self.shutdown().await?;
        Ok(termination)
    }

    async fn human_turn(&mut self) -> Result<Phase, SessionError> {
        let Some(line) = self.console.prompt(MOVE_PROMPT).await? else {
            return Ok(Phase::Terminated(Termination::InputClosed));
        };
        let Some(index) = Position::parse_index(&line) else {
            debug!(input = %line, "Non-numeric move");
            self.console.say("Please enter a number from 0 to 8.").await?;
            return Ok(Phase::AwaitingHumanMove);
        };

        let record = TrainingRecord::from_board(&self.board, index);
        match self.board.place(index, Mark::Human) {
            Ok(position) => {
                debug!(%position, "Human moved");
                self.record(record).await;
                Ok(Phase::Evaluating { mover: Mark::Human })
            }
            Err(e) => {
                debug!(error = %e, "Move rejected");
                self.console.say(&format!("{}. Try again.", e)).await?;
                Ok(Phase::AwaitingHumanMove)
            }
        }
    }

    async fn ai_turn(&mut self) -> Result<Phase, SessionError> {
        let position = match choose_move(&self.board, self.predictor.as_ref()) {
            Ok(position) => position,
            Err(GameError::NoPredictorAvailable) => {
                warn!("AI turn requested without a predictor");
                let message = format!(
                    "{}. There is no game history to learn from yet.",
                    GameError::NoPredictorAvailable
                );
                self.console.say(&message).await?;
                return Ok(Phase::Terminated(Termination::NoPredictorAvailable));
            }
            Err(e) => {
                warn!(error = %e, "AI could not move");
                return Ok(Phase::Evaluating { mover: Mark::Ai });
            }
        };

        let record = TrainingRecord::from_board(&self.board, position.to_index());
        if let Err(e) = self.board.place(position.to_index(), Mark::Ai) {
            warn!(error = %e, "AI move rejected");
            return Ok(Phase::Evaluating { mover: Mark::Ai });
        }
        info!(%position, "AI moved");
        self.record(record).await;
        self.console
            .say(&format!("AI plays {}.", position.to_index()))
            .await?;
        Ok(Phase::Evaluating { mover: Mark::Ai })
    }

    async fn evaluate(&mut self, mover: Mark) -> Result<Phase, SessionError> {
        let outcome = evaluate(&self.board);
        let Some(result) = GameResult::from_outcome(outcome) else {
            self.console.say(&render_board(&self.board)).await?;
            return Ok(match mover {
                Mark::Human => Phase::AwaitingAiMove,
                Mark::Ai => Phase::AwaitingHumanMove,
            });
        };

        info!(%result, "Round complete");
        self.results.push(result);
        if let Err(e) = self
            .leaderboard
            .update_leaderboard(&self.nickname, result)
            .await
        {
            warn!(error = %e, "Failed to update leaderboard");
        }
        Ok(Phase::RoundEnd(outcome))
    }

    async fn round_end(&mut self, outcome: Outcome) -> Result<Phase, SessionError> {
        self.console.say(&render_board(&self.board)).await?;
        let message = match outcome {
            Outcome::Win(Mark::Human) => "Player X wins!",
            Outcome::Win(Mark::Ai) => "Player O wins!",
            _ => "The game is a draw!",
        };
        self.console.say(message).await?;

        let answer = self.console.prompt(REPLAY_PROMPT).await?;
        if affirmative(answer.as_deref()) {
            self.board.reset();
            debug!(records = self.records.len(), "Replaying");
            return Ok(Phase::AwaitingHumanMove);
        }
        Ok(Phase::Terminated(match answer {
            Some(_) => Termination::Declined,
            None => Termination::InputClosed,
        }))
    }

    /// Keeps the record for this session and appends it to the history sink.
    async fn record(&mut self, record: TrainingRecord) {
        if let Err(e) = self.history.append_record(&record).await {
            warn!(error = %e, "Failed to append history record");
        }
        self.records.push(record);
    }

    async fn show_leaderboard(&mut self) -> Result<(), SessionError> {
        match self.leaderboard.read_leaderboard().await {
            Ok(board) => {
                let text = render_leaderboard(&board, Some(self.nickname.as_str()));
                self.console.say(&text).await?;
            }
            Err(e) => {
                warn!(error = %e, "Failed to read leaderboard");
                self.console.say("The leaderboard is unavailable.").await?;
            }
        }
        Ok(())
    }

    /// Shows the ranking, optionally retrains, and persists the predictor once.
    async fn shutdown(&mut self) -> Result<(), SessionError> {
        self.show_leaderboard().await?;

        if self.retrain_on_exit && !self.records.is_empty() {
            let mut all = self.stored_history.clone();
            all.extend(self.records.iter().cloned());
            if let Some(network) = self.provider.train(&all).await {
                info!(records = all.len(), "Predictor retrained");
                self.predictor = Some(network);
            }
        }

        if let Some(predictor) = &self.predictor {
            self.persisted = self.provider.persist(predictor).await;
        }
        Ok(())
    }

    fn report(&self, termination: Termination) -> SessionReport {
        SessionReport {
            nickname: self.nickname.clone(),
            results: self.results.clone(),
            records: self.records.clone(),
            termination,
            persisted: self.persisted,
        }
    }
}
