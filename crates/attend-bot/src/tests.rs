//! Pipeline tests: sync, registration and notification cycles against an
//! in-memory store, a scripted remote API and a recording notifier.

use std::{
  collections::{HashMap, HashSet},
  sync::Mutex,
};

use attend_core::{
  FetchError,
  listing::{AbsenceGroup, AbsentStudent, Faculty},
  notify::{Notifier, TextFormat},
  pagination::{Page, Pagination},
  registration::{RegisterOutcome, Registration},
  source::AttendanceApi,
  store::AttendanceStore,
  subject::{Subject, UnitRef},
};
use attend_store_sqlite::SqliteStore;
use chrono::NaiveDate;

use crate::{
  Context, SyncError, absence, cycle,
  dispatch::{DispatchReport, dispatch_groups},
  register::{Reply, handle_text},
  sync::sync_subjects,
  updates,
};

// ─── Fakes ───────────────────────────────────────────────────────────────────

type PageResult<T> = Result<Page<T>, FetchError>;

/// Serves pre-scripted pages; page `n` is element `n - 1`.
#[derive(Default)]
struct FakeApi {
  students:  Vec<PageResult<Subject>>,
  absences:  HashMap<i64, Vec<PageResult<AbsenceGroup>>>,
  faculties: Option<Vec<Faculty>>,
  requests:  Mutex<Vec<(i64, NaiveDate, u32)>>,
}

fn scripted<T: Clone>(pages: &[PageResult<T>], page: u32) -> PageResult<T> {
  pages
    .get(page as usize - 1)
    .cloned()
    .unwrap_or_else(|| Err(FetchError::Transport { page, reason: "HTTP 404".into() }))
}

impl AttendanceApi for FakeApi {
  async fn students(&self, page: u32) -> PageResult<Subject> { scripted(&self.students, page) }

  async fn absences(&self, faculty_id: i64, day: NaiveDate, page: u32) -> PageResult<AbsenceGroup> {
    self.requests.lock().unwrap().push((faculty_id, day, page));
    let pages = self.absences.get(&faculty_id).map(Vec::as_slice).unwrap_or_default();
    scripted(pages, page)
  }

  async fn faculties(&self) -> Result<Vec<Faculty>, FetchError> {
    self
      .faculties
      .clone()
      .ok_or(FetchError::Transport { page: 1, reason: "HTTP 500".into() })
  }
}

#[derive(Debug, thiserror::Error)]
#[error("chat {0} refused delivery")]
struct Refused(i64);

/// Records every message; refuses delivery to chats in `refuse`.
#[derive(Default)]
struct RecordingNotifier {
  sent:   Mutex<Vec<(i64, String, TextFormat)>>,
  refuse: HashSet<i64>,
}

impl RecordingNotifier {
  fn sent(&self) -> Vec<(i64, String, TextFormat)> { self.sent.lock().unwrap().clone() }
}

impl Notifier for RecordingNotifier {
  type Error = Refused;

  async fn send(&self, chat_id: i64, text: &str, format: TextFormat) -> Result<(), Refused> {
    if self.refuse.contains(&chat_id) {
      return Err(Refused(chat_id));
    }
    self.sent.lock().unwrap().push((chat_id, text.to_owned(), format));
    Ok(())
  }
}

#[derive(Debug, thiserror::Error)]
#[error("database is locked")]
struct Locked;

/// A store whose every call fails.
struct OfflineStore;

impl AttendanceStore for OfflineStore {
  type Error = Locked;

  async fn upsert_subject(&self, _subject: Subject) -> Result<(), Locked> { Err(Locked) }

  async fn get_subject(&self, _hemis_id: i64) -> Result<Option<Subject>, Locked> { Err(Locked) }

  async fn list_subjects(&self) -> Result<Vec<Subject>, Locked> { Err(Locked) }

  async fn register(&self, _hemis_id: i64, _chat_id: i64) -> Result<RegisterOutcome, Locked> {
    Err(Locked)
  }

  async fn get_registration(&self, _hemis_id: i64) -> Result<Option<Registration>, Locked> {
    Err(Locked)
  }

  async fn list_registrations(&self) -> Result<Vec<Registration>, Locked> { Err(Locked) }
}

// ─── Fixtures ────────────────────────────────────────────────────────────────

fn day() -> NaiveDate { NaiveDate::from_ymd_opt(2024, 1, 10).unwrap() }

fn envelope(current_page: u32, last_page: u32) -> Pagination {
  Pagination { total: 0, current_page, last_page, per_page: 20, total_pages: None }
}

fn page<T>(items: Vec<T>, current_page: u32, last_page: u32) -> PageResult<T> {
  Ok(Page { items, pagination: envelope(current_page, last_page) })
}

fn subject(record_id: i64, name: &str, hemis_id: i64) -> Subject {
  Subject {
    record_id,
    name: name.into(),
    hemis_id,
    faculty: UnitRef { id: 1, name: "Engineering".into() },
    group: UnitRef { id: 7, name: "CS-21".into() },
  }
}

fn absent(name: &str, hemis_id: i64) -> AbsentStudent {
  AbsentStudent { id: hemis_id - 454, name: name.into(), hemis_id }
}

fn group(group_id: i64, students: Vec<AbsentStudent>) -> AbsenceGroup {
  AbsenceGroup {
    group_id,
    group_name: format!("G-{group_id}"),
    total_students: 25,
    absent_count: students.len() as u32,
    absent_students: students,
  }
}

fn faculty(id: i64) -> Faculty { Faculty { id, name: format!("Faculty {id}") } }

async fn store_with(subjects: &[(i64, &str)], registrations: &[(i64, i64)]) -> SqliteStore {
  let store = SqliteStore::open_in_memory().await.unwrap();
  for (hemis_id, name) in subjects {
    store.upsert_subject(subject(*hemis_id - 454, name, *hemis_id)).await.unwrap();
  }
  for (hemis_id, chat_id) in registrations {
    store.register(*hemis_id, *chat_id).await.unwrap();
  }
  store
}

// ─── Sync ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn sync_is_idempotent() {
  let api = FakeApi {
    students: vec![
      page(vec![subject(1, "Ana", 555), subject(2, "Ben", 556)], 1, 2),
      page(vec![subject(3, "Cy", 557)], 2, 2),
    ],
    ..FakeApi::default()
  };
  let store = SqliteStore::open_in_memory().await.unwrap();

  let first = sync_subjects(&api, &store).await.unwrap();
  let after_first = store.list_subjects().await.unwrap();
  let second = sync_subjects(&api, &store).await.unwrap();
  let after_second = store.list_subjects().await.unwrap();

  assert_eq!(first, second);
  assert_eq!((first.pages, first.subjects), (2, 3));
  assert_eq!(after_first, after_second);
  assert_eq!(after_second.len(), 3);
}

#[tokio::test]
async fn sync_overwrites_changed_subjects() {
  let store = store_with(&[(555, "Ana")], &[]).await;
  let mut moved = subject(101, "Ana Maria", 555);
  moved.group = UnitRef { id: 8, name: "CS-22".into() };
  let api = FakeApi { students: vec![page(vec![moved.clone()], 1, 1)], ..FakeApi::default() };

  sync_subjects(&api, &store).await.unwrap();
  assert_eq!(store.get_subject(555).await.unwrap(), Some(moved));
}

#[tokio::test]
async fn sync_failure_keeps_earlier_pages() {
  let api = FakeApi {
    students: vec![
      page(vec![subject(1, "Ana", 555)], 1, 3),
      Err(FetchError::Validation { page: 2, reason: "missing field `data`".into() }),
      page(vec![subject(3, "Cy", 557)], 3, 3),
    ],
    ..FakeApi::default()
  };
  let store = SqliteStore::open_in_memory().await.unwrap();

  let err = sync_subjects(&api, &store).await.unwrap_err();
  assert!(matches!(err, SyncError::Fetch(FetchError::Validation { page: 2, .. })), "{err}");

  let ids: Vec<_> = store.list_subjects().await.unwrap().iter().map(|s| s.hemis_id).collect();
  assert_eq!(ids, [555]);
}

#[tokio::test]
async fn empty_roster_syncs_nothing() {
  let api = FakeApi { students: vec![page(vec![], 1, 0)], ..FakeApi::default() };
  let store = SqliteStore::open_in_memory().await.unwrap();

  let report = sync_subjects(&api, &store).await.unwrap();
  assert_eq!((report.pages, report.subjects), (0, 0));
}

// ─── Registration ────────────────────────────────────────────────────────────

#[tokio::test]
async fn register_after_sync_then_reject_duplicate() {
  const A: i64 = 1001;
  const B: i64 = 2002;

  let api = FakeApi {
    students: vec![page(vec![subject(101, "Ana", 555)], 1, 1)],
    ..FakeApi::default()
  };
  let store = SqliteStore::open_in_memory().await.unwrap();
  sync_subjects(&api, &store).await.unwrap();

  assert_eq!(handle_text(&store, A, "555").await.unwrap(), Reply::Registered);
  assert_eq!(store.get_registration(555).await.unwrap().unwrap().chat_id, A);

  assert_eq!(handle_text(&store, B, "555").await.unwrap(), Reply::AlreadyRegistered);
  let rows = store.list_registrations().await.unwrap();
  assert_eq!(rows.len(), 1);
  assert_eq!((rows[0].hemis_id, rows[0].chat_id), (555, A));
}

#[tokio::test]
async fn registration_input_errors_touch_nothing() {
  let store = store_with(&[(555, "Ana")], &[]).await;

  assert_eq!(handle_text(&store, 1, "/start").await.unwrap(), Reply::Prompt);
  assert_eq!(handle_text(&store, 1, "five").await.unwrap(), Reply::InvalidFormat);
  assert_eq!(handle_text(&store, 1, "55.5").await.unwrap(), Reply::InvalidFormat);
  assert_eq!(handle_text(&store, 1, "999").await.unwrap(), Reply::NotFound);
  assert!(store.list_registrations().await.unwrap().is_empty());

  assert_eq!(handle_text(&store, 1, " 555 ").await.unwrap(), Reply::Registered);
}

#[tokio::test]
async fn replies_are_sent_back_to_the_sender() {
  let store = store_with(&[(555, "Ana")], &[]).await;
  let notifier = RecordingNotifier::default();

  let reply = updates::respond(&store, &notifier, 1001, "555").await;
  assert_eq!(reply, Reply::Registered);

  let sent = notifier.sent();
  assert_eq!(sent.len(), 1);
  assert_eq!(sent[0], (1001, Reply::Registered.text().to_owned(), TextFormat::Plain));
}

#[tokio::test]
async fn store_failure_is_answered_with_a_retry_hint() {
  let notifier = RecordingNotifier::default();

  let reply = updates::respond(&OfflineStore, &notifier, 1001, "555").await;
  assert_eq!(reply, Reply::Unavailable);

  let sent = notifier.sent();
  assert_eq!(sent.len(), 1);
  assert_eq!(sent[0].0, 1001);
  assert!(sent[0].1.contains("try again later"), "{}", sent[0].1);
}

#[tokio::test]
async fn store_failure_during_dispatch_counts_as_failed() {
  let notifier = RecordingNotifier::default();
  let groups = [group(1, vec![absent("Ana", 555), absent("Ben", 556)])];
  let mut report = DispatchReport::default();

  dispatch_groups(&OfflineStore, &notifier, day(), &groups, &mut report).await;

  assert_eq!(report, DispatchReport { sent: 0, skipped: 0, failed: 2 });
  assert!(notifier.sent().is_empty());
}

// ─── Absence query ───────────────────────────────────────────────────────────

#[tokio::test]
async fn absence_query_collects_every_page_in_order() {
  let api = FakeApi {
    absences: HashMap::from([(
      1,
      vec![
        page(vec![group(1, vec![]), group(2, vec![])], 1, 2),
        page(vec![group(3, vec![])], 2, 2),
      ],
    )]),
    ..FakeApi::default()
  };

  let groups = absence::absent_groups(&api, 1, day()).await;
  let ids: Vec<_> = groups.iter().map(|g| g.group_id).collect();
  assert_eq!(ids, [1, 2, 3]);

  let requests = api.requests.lock().unwrap().clone();
  assert_eq!(requests, [(1, day(), 1), (1, day(), 2)]);
}

#[tokio::test]
async fn absence_query_keeps_partial_result_on_failure() {
  let api = FakeApi {
    absences: HashMap::from([(
      1,
      vec![
        page(vec![group(1, vec![absent("Ana", 555)])], 1, 3),
        Err(FetchError::Transport { page: 2, reason: "HTTP 502".into() }),
        page(vec![group(3, vec![])], 3, 3),
      ],
    )]),
    ..FakeApi::default()
  };

  let groups = absence::absent_groups(&api, 1, day()).await;
  assert_eq!(groups.len(), 1);
  assert_eq!(groups[0].absent_students[0].hemis_id, 555);
  assert_eq!(api.requests.lock().unwrap().len(), 2);
}

// ─── Dispatch ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn cycle_notifies_registered_parent() {
  const A: i64 = 1001;

  let store = store_with(&[(555, "Ana")], &[(555, A)]).await;
  let api = FakeApi {
    faculties: Some(vec![faculty(1)]),
    absences: HashMap::from([(1, vec![page(vec![group(7, vec![absent("Ana", 555)])], 1, 1)])]),
    ..FakeApi::default()
  };
  let ctx = Context::new(store, api, RecordingNotifier::default());

  let report = cycle::run_cycle(&ctx, day()).await;
  assert_eq!(report, DispatchReport { sent: 1, skipped: 0, failed: 0 });

  let sent = ctx.notifier.sent();
  assert_eq!(sent.len(), 1);
  let (chat_id, text, format) = &sent[0];
  assert_eq!(*chat_id, A);
  assert_eq!(*format, TextFormat::Html);
  assert!(text.contains("Ana"), "{text}");
  assert!(text.contains("2024-01-10"), "{text}");
}

#[tokio::test]
async fn only_registered_students_are_notified() {
  let store = store_with(
    &[(501, "A"), (502, "B"), (503, "C"), (504, "D"), (505, "E")],
    &[(501, 11), (503, 13), (505, 15)],
  )
  .await;
  let groups = [
    group(1, vec![absent("A", 501), absent("B", 502), absent("C", 503)]),
    group(2, vec![absent("D", 504), absent("E", 505), absent("Nobody", 999)]),
  ];
  let notifier = RecordingNotifier::default();
  let mut report = DispatchReport::default();

  dispatch_groups(&store, &notifier, day(), &groups, &mut report).await;

  assert_eq!(report, DispatchReport { sent: 3, skipped: 3, failed: 0 });
  let chats: Vec<_> = notifier.sent().into_iter().map(|(chat, ..)| chat).collect();
  assert_eq!(chats, [11, 13, 15]);
}

#[tokio::test]
async fn one_failed_delivery_does_not_stop_the_batch() {
  let store = store_with(
    &[(501, "A"), (502, "B"), (503, "C"), (504, "D")],
    &[(501, 11), (502, 12), (503, 13), (504, 14)],
  )
  .await;
  let api = FakeApi {
    faculties: Some(vec![faculty(1), faculty(2)]),
    absences: HashMap::from([
      (1, vec![page(vec![group(1, vec![absent("A", 501), absent("B", 502)])], 1, 1)]),
      (2, vec![page(vec![group(2, vec![absent("C", 503)]), group(3, vec![absent("D", 504)])], 1, 1)]),
    ]),
    ..FakeApi::default()
  };
  let notifier = RecordingNotifier { refuse: HashSet::from([12]), ..RecordingNotifier::default() };
  let ctx = Context::new(store, api, notifier);

  let report = cycle::run_cycle(&ctx, day()).await;

  assert_eq!(report, DispatchReport { sent: 3, skipped: 0, failed: 1 });
  let chats: Vec<_> = ctx.notifier.sent().into_iter().map(|(chat, ..)| chat).collect();
  assert_eq!(chats, [11, 13, 14]);
}

#[tokio::test]
async fn unreachable_faculty_listing_sends_nothing() {
  let store = store_with(&[(555, "Ana")], &[(555, 1001)]).await;
  let api = FakeApi {
    faculties: None,
    absences: HashMap::from([(1, vec![page(vec![group(7, vec![absent("Ana", 555)])], 1, 1)])]),
    ..FakeApi::default()
  };
  let ctx = Context::new(store, api, RecordingNotifier::default());

  let report = cycle::run_cycle(&ctx, day()).await;

  assert_eq!(report, DispatchReport::default());
  assert!(ctx.notifier.sent().is_empty());
  assert!(ctx.api.requests.lock().unwrap().is_empty());
}
