//! Background task that owns the view controller.
//!
//! The UI never touches cache state. It sends [`Action`]s to the worker and
//! reads the latest [`Snapshot`] from a watch channel. The worker applies
//! actions strictly in order, one at a time.

use tokio::sync::{mpsc, watch};
use tracing::{debug, warn};

use crate::api::{DataSource, Employee, FetchResult};
use crate::controller::{Filter, Snapshot, ViewController};
use crate::event::Event;

/// User intents forwarded to the controller
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
  Mount,
  Select(Option<Employee>),
  ViewMore,
  Refresh,
  SetApproval {
    transaction_id: String,
    approved: bool,
  },
}

/// UI-side handle to a running worker
pub struct WorkerHandle {
  actions: mpsc::UnboundedSender<Action>,
  snapshots: watch::Receiver<Snapshot>,
}

impl WorkerHandle {
  pub fn send(&self, action: Action) {
    if self.actions.send(action).is_err() {
      warn!("controller worker has stopped");
    }
  }

  /// Latest published state
  pub fn snapshot(&self) -> Snapshot {
    self.snapshots.borrow().clone()
  }

  #[cfg(test)]
  pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
    self.snapshots.clone()
  }
}

/// Start a worker for `source`. Failures are posted to `events`.
pub fn spawn<S: DataSource>(source: S, events: mpsc::UnboundedSender<Event>) -> WorkerHandle {
  let (action_tx, action_rx) = mpsc::unbounded_channel();
  let (snapshot_tx, snapshot_rx) = watch::channel(Snapshot::default());

  let worker = Worker {
    controller: ViewController::new(source).with_publisher(snapshot_tx),
    actions: action_rx,
    events,
  };
  tokio::spawn(worker.run());

  WorkerHandle {
    actions: action_tx,
    snapshots: snapshot_rx,
  }
}

struct Worker<S> {
  controller: ViewController<S>,
  actions: mpsc::UnboundedReceiver<Action>,
  events: mpsc::UnboundedSender<Event>,
}

impl<S: DataSource> Worker<S> {
  async fn run(mut self) {
    while let Some(first) = self.actions.recv().await {
      let mut batch = vec![first];
      while let Ok(next) = self.actions.try_recv() {
        batch.push(next);
      }

      let batch = coalesce(batch, self.controller.filter());
      for action in batch {
        self.handle(action).await;
      }
    }
    debug!("action channel closed, worker exiting");
  }

  async fn handle(&mut self, action: Action) {
    debug!(?action, "handling action");
    let result: FetchResult<()> = match action {
      Action::Mount => self.controller.mount().await,
      Action::Select(selection) => self.controller.select_employee(selection.as_ref()).await,
      Action::ViewMore => self.controller.view_more().await.map(|_| ()),
      Action::Refresh => self.controller.refresh().await,
      Action::SetApproval {
        transaction_id,
        approved,
      } => self
        .controller
        .set_transaction_approval(&transaction_id, approved)
        .await
        .map(|_| ()),
    };

    if let Err(e) = result {
      let _ = self.events.send(Event::Error(e.to_string()));
    }
  }
}

/// Drop work made pointless by a later filter switch in the same batch.
///
/// A `Select` only counts as a switch when it picks a filter other than the
/// one in effect at that point of the batch, starting from `current`. Empty
/// selections and re-picks of the active filter never supersede anything.
/// Everything before the last switch except `Mount` and approvals is dropped:
/// earlier selections, view-more and refresh requests would only fetch data
/// the switch replaces.
pub fn coalesce(actions: Vec<Action>, current: &Filter) -> Vec<Action> {
  let mut filter = current.clone();
  let mut last_switch = None;
  for (i, action) in actions.iter().enumerate() {
    if let Action::Select(Some(employee)) = action {
      let next = Filter::from(employee);
      if next != filter {
        filter = next;
        last_switch = Some(i);
      }
    }
  }

  let Some(last_switch) = last_switch else {
    return actions;
  };

  let before = actions.len();
  let kept: Vec<Action> = actions
    .into_iter()
    .enumerate()
    .filter(|(i, action)| {
      *i >= last_switch || matches!(action, Action::Mount | Action::SetApproval { .. })
    })
    .map(|(_, action)| action)
    .collect();

  if kept.len() < before {
    debug!(dropped = before - kept.len(), "coalesced superseded actions");
  }
  kept
}
