//! Hand-written mock collaborators shared by the component tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{Semaphore, broadcast};
use uuid::Uuid;

use riptide_shared::ThreadConfig;
use riptide_shared::models::{
    AuthorRef, Comment, CommentEvent, CommentPage, CommentStatus, CreateCommentRequest,
    CreateCommentResponse,
};

use crate::api::CommentApi;
use crate::error::{ThreadError, ThreadResult};
use crate::scheduler::{ScheduledTask, Scheduler, TimerGuard};
use crate::session::StaticSession;
use crate::sockets::SocketClient;
use crate::thread::{CommentThread, ParentItem, ThreadView, ViewMetrics};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A persisted comment from some other actor.
pub(crate) fn comment(body: &str) -> Comment {
    Comment {
        id: Uuid::new_v4(),
        local_id: None,
        author: AuthorRef {
            id: Uuid::new_v4(),
            username: "other".to_string(),
            icon_time: 0,
        },
        body: body.to_string(),
        attachment: None,
        created_at: Utc::now().timestamp(),
        status: CommentStatus::Persisted,
    }
}

/// A history page in wire shape.
pub(crate) fn page(
    comments: Vec<Comment>,
    cursor: Option<&str>,
    room: Option<&str>,
) -> CommentPage {
    CommentPage {
        comments: Some(comments),
        load_previous: cursor.map(str::to_string),
        socket_room_name: room.map(str::to_string),
    }
}

/// Scripted [`CommentApi`]: queued page and create responses, call counts,
/// and an optional gate that holds the next request open until released.
pub(crate) struct MockApi {
    pages: Mutex<VecDeque<ThreadResult<CommentPage>>>,
    creates: Mutex<VecDeque<ThreadResult<CreateCommentResponse>>>,
    fetch_count: AtomicUsize,
    create_count: AtomicUsize,
    blocked: AtomicBool,
    gate: Semaphore,
}

impl MockApi {
    pub(crate) fn new() -> Self {
        Self {
            pages: Mutex::new(VecDeque::new()),
            creates: Mutex::new(VecDeque::new()),
            fetch_count: AtomicUsize::new(0),
            create_count: AtomicUsize::new(0),
            blocked: AtomicBool::new(false),
            gate: Semaphore::new(0),
        }
    }

    pub(crate) fn push_page(&self, page: CommentPage) {
        lock(&self.pages).push_back(Ok(page));
    }

    pub(crate) fn push_error(&self, message: &str) {
        lock(&self.pages).push_back(Err(ThreadError::Fetch(message.to_string())));
    }

    pub(crate) fn push_create_ok(&self, comment: Comment) {
        lock(&self.creates).push_back(Ok(CreateCommentResponse { comment }));
    }

    pub(crate) fn push_create_err(&self, message: &str) {
        lock(&self.creates).push_back(Err(ThreadError::Write(message.to_string())));
    }

    /// Hold the next request open until [`MockApi::release`] is called.
    pub(crate) fn block_next(&self) {
        self.blocked.store(true, Ordering::SeqCst);
    }

    pub(crate) fn release(&self) {
        self.gate.add_permits(1);
    }

    pub(crate) fn fetch_count(&self) -> usize {
        self.fetch_count.load(Ordering::SeqCst)
    }

    pub(crate) fn create_count(&self) -> usize {
        self.create_count.load(Ordering::SeqCst)
    }

    async fn wait_if_blocked(&self) {
        if self.blocked.swap(false, Ordering::SeqCst) {
            let permit = self.gate.acquire().await.expect("gate open");
            permit.forget();
        }
    }
}

#[async_trait]
impl CommentApi for MockApi {
    async fn fetch_page(
        &self,
        _parent_id: Uuid,
        _limit: usize,
        _offset: &str,
    ) -> ThreadResult<CommentPage> {
        self.fetch_count.fetch_add(1, Ordering::SeqCst);
        self.wait_if_blocked().await;
        lock(&self.pages)
            .pop_front()
            .unwrap_or_else(|| Err(ThreadError::Fetch("no scripted page".to_string())))
    }

    async fn create(
        &self,
        _parent_id: Uuid,
        _request: CreateCommentRequest,
    ) -> ThreadResult<CreateCommentResponse> {
        self.create_count.fetch_add(1, Ordering::SeqCst);
        self.wait_if_blocked().await;
        lock(&self.creates)
            .pop_front()
            .unwrap_or_else(|| Err(ThreadError::Write("no scripted response".to_string())))
    }
}

/// Recording [`SocketClient`] with an in-process event stream.
pub(crate) struct RecordingSocket {
    joined: Mutex<Vec<String>>,
    left: Mutex<Vec<String>>,
    sender: broadcast::Sender<CommentEvent>,
}

impl RecordingSocket {
    pub(crate) fn new() -> Self {
        let (sender, _) = broadcast::channel(16);
        Self {
            joined: Mutex::new(Vec::new()),
            left: Mutex::new(Vec::new()),
            sender,
        }
    }

    pub(crate) fn publish(&self, event: CommentEvent) {
        let _ = self.sender.send(event);
    }

    pub(crate) fn joined(&self) -> Vec<String> {
        lock(&self.joined).clone()
    }

    pub(crate) fn left(&self) -> Vec<String> {
        lock(&self.left).clone()
    }
}

impl SocketClient for RecordingSocket {
    fn join(&self, room: &str) {
        lock(&self.joined).push(room.to_string());
    }

    fn leave(&self, room: &str) {
        lock(&self.left).push(room.to_string());
    }

    fn subscribe(&self) -> broadcast::Receiver<CommentEvent> {
        self.sender.subscribe()
    }
}

/// Recording [`ThreadView`] with scriptable viewport metrics.
pub(crate) struct RecordingView {
    metrics: Mutex<ViewMetrics>,
    height_after_change: Mutex<VecDeque<f64>>,
    changed: AtomicUsize,
    scrolled_to_bottom: AtomicUsize,
    last_scroll_top: Mutex<Option<f64>>,
}

impl RecordingView {
    pub(crate) fn new() -> Self {
        Self {
            metrics: Mutex::new(ViewMetrics {
                scroll_top: 0.0,
                scroll_height: 0.0,
                client_height: 0.0,
            }),
            height_after_change: Mutex::new(VecDeque::new()),
            changed: AtomicUsize::new(0),
            scrolled_to_bottom: AtomicUsize::new(0),
            last_scroll_top: Mutex::new(None),
        }
    }

    pub(crate) fn set_metrics(&self, scroll_top: f64, scroll_height: f64, client_height: f64) {
        *lock(&self.metrics) = ViewMetrics {
            scroll_top,
            scroll_height,
            client_height,
        };
    }

    /// Queue a content height the viewport reports after an upcoming
    /// change notification, simulating the merge growing the content.
    /// Heights are consumed one per notification, in order.
    pub(crate) fn queue_height_after_change(&self, scroll_height: f64) {
        lock(&self.height_after_change).push_back(scroll_height);
    }

    pub(crate) fn changed_count(&self) -> usize {
        self.changed.load(Ordering::SeqCst)
    }

    pub(crate) fn scroll_to_bottom_count(&self) -> usize {
        self.scrolled_to_bottom.load(Ordering::SeqCst)
    }

    pub(crate) fn last_scroll_top(&self) -> Option<f64> {
        *lock(&self.last_scroll_top)
    }
}

impl ThreadView for RecordingView {
    fn thread_changed(&self) {
        self.changed.fetch_add(1, Ordering::SeqCst);
        if let Some(height) = lock(&self.height_after_change).pop_front() {
            lock(&self.metrics).scroll_height = height;
        }
    }

    fn scroll_to_bottom(&self) {
        self.scrolled_to_bottom.fetch_add(1, Ordering::SeqCst);
    }

    fn metrics(&self) -> ViewMetrics {
        *lock(&self.metrics)
    }

    fn set_scroll_top(&self, offset: f64) {
        *lock(&self.last_scroll_top) = Some(offset);
        lock(&self.metrics).scroll_top = offset;
    }
}

/// Manually-fired [`Scheduler`] for deterministic timer tests.
pub(crate) struct ManualScheduler {
    pending: Mutex<Vec<(TimerGuard, ScheduledTask)>>,
}

impl ManualScheduler {
    pub(crate) fn new() -> Self {
        Self {
            pending: Mutex::new(Vec::new()),
        }
    }

    /// Run every currently-pending uncancelled task. Tasks scheduled while
    /// firing land in the next batch.
    pub(crate) fn fire_pending(&self) {
        let batch: Vec<_> = lock(&self.pending).drain(..).collect();
        for (guard, task) in batch {
            if !guard.is_cancelled() {
                task();
            }
        }
    }

    /// Number of pending, uncancelled timers.
    pub(crate) fn live_timers(&self) -> usize {
        lock(&self.pending)
            .iter()
            .filter(|(guard, _)| !guard.is_cancelled())
            .count()
    }
}

impl Scheduler for ManualScheduler {
    fn schedule_after(&self, _delay: Duration, task: ScheduledTask) -> TimerGuard {
        let guard = TimerGuard::new(Arc::new(AtomicBool::new(false)));
        lock(&self.pending).push((guard.clone(), task));
        guard
    }
}

/// Everything a component test needs: a thread wired to recording mocks.
pub(crate) struct TestThread {
    pub thread: CommentThread,
    pub api: Arc<MockApi>,
    pub sockets: Arc<RecordingSocket>,
    pub view: Arc<RecordingView>,
    pub author: AuthorRef,
}

impl TestThread {
    pub(crate) fn new() -> Self {
        Self::build(None, false, true)
    }

    pub(crate) fn conversation() -> Self {
        Self::build(None, true, true)
    }

    pub(crate) fn anonymous() -> Self {
        Self::build(None, false, false)
    }

    pub(crate) fn with_parent_entity(entity_id: Option<Uuid>) -> Self {
        Self::build(entity_id, false, true)
    }

    fn build(entity_id: Option<Uuid>, conversation: bool, logged_in: bool) -> Self {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();

        let author = AuthorRef {
            id: Uuid::new_v4(),
            username: "me".to_string(),
            icon_time: 0,
        };
        let session = if logged_in {
            StaticSession::logged_in(author.clone())
        } else {
            StaticSession::anonymous()
        };

        let api = Arc::new(MockApi::new());
        let sockets = Arc::new(RecordingSocket::new());
        let view = Arc::new(RecordingView::new());

        let parent = ParentItem {
            id: Uuid::new_v4(),
            entity_id,
        };
        let thread = CommentThread::new(
            &parent,
            conversation,
            ThreadConfig::default(),
            api.clone(),
            Arc::new(session),
            sockets.clone(),
            view.clone(),
        );

        Self {
            thread,
            api,
            sockets,
            view,
            author,
        }
    }
}
