//! Command handlers that sit between a front-end and the conversion engine.
//!
//! The controller owns no conversion logic. It keeps the current selection,
//! decides when to call [`ConversionEngine::convert`] and hands the outcome to
//! a [`Renderer`].

use crate::core::convert::{ConversionEngine, ConversionResult, parse_amount};
use crate::core::currency::CurrencyCode;
use crate::core::debounce::Debouncer;
use crate::core::error::ConvertError;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::watch;
use tracing::debug;

/// Presentation side of the controller.
pub trait Renderer: Send + Sync {
    /// Called with `true` when the first conversion starts and `false` when
    /// the last outstanding one finishes.
    fn loading(&self, active: bool);
    fn success(&self, result: &ConversionResult);
    fn error(&self, error: &ConvertError);
}

/// What the user currently has entered.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    pub from: Option<CurrencyCode>,
    pub to: Option<CurrencyCode>,
    pub amount: String,
}

impl Selection {
    pub fn new(from: Option<CurrencyCode>, to: Option<CurrencyCode>) -> Self {
        Self {
            from,
            to,
            amount: String::new(),
        }
    }

    /// Exchanges source and target. Only happens when both are selected.
    pub fn swap(&mut self) -> bool {
        if self.from.is_none() || self.to.is_none() {
            return false;
        }
        std::mem::swap(&mut self.from, &mut self.to);
        true
    }

    pub fn has_amount(&self) -> bool {
        !self.amount.trim().is_empty()
    }

    pub fn is_complete(&self) -> bool {
        self.has_amount() && self.from.is_some() && self.to.is_some()
    }
}

struct Dispatcher {
    engine: Arc<ConversionEngine>,
    renderer: Arc<dyn Renderer>,
    in_flight: AtomicUsize,
}

impl Dispatcher {
    fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    // Results are rendered in arrival order; overlapping runs are not cancelled
    async fn run(&self, selection: Selection) {
        if self.in_flight.fetch_add(1, Ordering::SeqCst) == 0 {
            self.renderer.loading(true);
        }

        let from = selection.from.as_ref().map(CurrencyCode::as_str);
        let to = selection.to.as_ref().map(CurrencyCode::as_str);
        let result = self
            .engine
            .convert(
                parse_amount(&selection.amount),
                from.unwrap_or_default(),
                to.unwrap_or_default(),
            )
            .await;

        if self.in_flight.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.renderer.loading(false);
        }

        match result {
            Ok(result) => self.renderer.success(&result),
            Err(error) => {
                debug!(%error, "Conversion failed");
                self.renderer.error(&error)
            }
        }
    }
}

pub struct InteractionController {
    dispatcher: Arc<Dispatcher>,
    // Debounced runs read the live value when their timer fires
    selection: watch::Sender<Selection>,
    debouncer: Debouncer,
}

impl InteractionController {
    pub fn new(
        engine: Arc<ConversionEngine>,
        renderer: Arc<dyn Renderer>,
        selection: Selection,
        debounce: Duration,
    ) -> Self {
        Self {
            dispatcher: Arc::new(Dispatcher {
                engine,
                renderer,
                in_flight: AtomicUsize::new(0),
            }),
            selection: watch::Sender::new(selection),
            debouncer: Debouncer::new(debounce),
        }
    }

    pub fn selection(&self) -> Selection {
        self.selection.borrow().clone()
    }

    pub fn select_from(&mut self, code: &str) {
        let code = CurrencyCode::parse(code);
        self.selection.send_modify(|selection| selection.from = code);
        self.cancel_if_incomplete();
    }

    pub fn select_to(&mut self, code: &str) {
        let code = CurrencyCode::parse(code);
        self.selection.send_modify(|selection| selection.to = code);
        self.cancel_if_incomplete();
    }

    /// Records a new amount and, when the selection is complete, schedules a
    /// conversion for after the input goes quiet.
    ///
    /// The scheduled conversion uses whatever is selected when it fires, not
    /// what was selected when the amount was typed.
    pub fn amount_changed(&mut self, amount: &str) {
        let amount = amount.to_string();
        self.selection.send_modify(|selection| selection.amount = amount);
        if !self.selection.borrow().is_complete() {
            self.debouncer.cancel();
            return;
        }
        let dispatcher = Arc::clone(&self.dispatcher);
        let live = self.selection.subscribe();
        self.debouncer.schedule(async move {
            let current = live.borrow().clone();
            if current.is_complete() {
                dispatcher.run(current).await;
            }
        });
    }

    /// Explicit conversion. Ignored while a conversion is still loading.
    pub async fn submit(&mut self) {
        if self.dispatcher.is_busy() {
            debug!("Submit ignored while loading");
            return;
        }
        self.dispatcher.run(self.selection()).await;
    }

    /// Swaps the currencies and converts again right away if an amount is
    /// entered. A pending debounced conversion is dropped in favour of this one.
    pub async fn swap(&mut self) {
        let mut swapped = false;
        self.selection.send_modify(|selection| swapped = selection.swap());
        let current = self.selection();
        if swapped && current.has_amount() {
            self.debouncer.cancel();
            self.dispatcher.run(current).await;
        }
    }

    pub fn has_pending_input(&self) -> bool {
        self.debouncer.is_pending()
    }

    fn cancel_if_incomplete(&mut self) {
        if !self.selection.borrow().is_complete() {
            self.debouncer.cancel();
        }
    }
}
