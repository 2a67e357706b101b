use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::models::*;
use crate::{owner, project_url, request_id, task_url, Db, Store, INBOX_PROJECT_ID};

/// Color id the service assigns when none is given ("charcoal").
const DEFAULT_COLOR: u32 = 47;

type HandlerError = (StatusCode, String);
type HandlerResult<T> = Result<T, HandlerError>;

fn not_found(what: &str) -> HandlerError {
    (StatusCode::NOT_FOUND, format!("{what} not found"))
}

fn bad_request(msg: impl Into<String>) -> HandlerError {
    (StatusCode::BAD_REQUEST, msg.into())
}

/// Record a create's response under its request id and hand it back as JSON.
fn finish_create<T: Serialize>(
    store: &mut Store,
    request_id: Option<&str>,
    created: &T,
) -> HandlerResult<Json<Value>> {
    let value = serde_json::to_value(created)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    store.remember(request_id, &value);
    Ok(Json(value))
}

fn due_from(string: Option<String>, date: Option<String>, datetime: Option<String>) -> Option<Due> {
    if string.as_deref() == Some("no date") {
        return None;
    }
    if string.is_none() && date.is_none() && datetime.is_none() {
        return None;
    }
    let day = date
        .clone()
        .or_else(|| datetime.as_ref().map(|d| d.chars().take(10).collect()))
        .unwrap_or_default();
    let string = string.or(date).unwrap_or_else(|| day.clone());
    Some(Due {
        recurring: string.starts_with("every"),
        string,
        date: day,
        datetime,
        timezone: None,
    })
}

/// Remove `roots`, every subtask below them, and the comments on all of them.
fn remove_tasks(store: &mut Store, roots: Vec<u64>) {
    let mut doomed = roots;
    let mut i = 0;
    while i < doomed.len() {
        let parent = doomed[i];
        doomed.extend(store.tasks.values().filter(|t| t.parent_id == Some(parent)).map(|t| t.id));
        i += 1;
    }
    store.tasks.retain(|tid, _| !doomed.contains(tid));
    store.comments.retain(|_, c| c.task_id.map_or(true, |tid| !doomed.contains(&tid)));
}

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

pub async fn list_projects(State(db): State<Db>) -> Json<Vec<Project>> {
    Json(db.read().await.projects.values().cloned().collect())
}

pub async fn get_project(State(db): State<Db>, Path(id): Path<u64>) -> HandlerResult<Json<Project>> {
    let store = db.read().await;
    store.projects.get(&id).cloned().map(Json).ok_or_else(|| not_found("Project"))
}

pub async fn create_project(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<CreateProject>,
) -> HandlerResult<Json<Value>> {
    let req_id = request_id(&headers);
    let mut store = db.write().await;
    if let Some(previous) = store.replay(req_id) {
        return Ok(Json(previous));
    }
    if let Some(parent) = input.parent_id {
        if !store.projects.contains_key(&parent) {
            return Err(bad_request("Parent project not found"));
        }
    }

    let id = store.allocate_id();
    let siblings = store.projects.values().filter(|p| p.parent_id == input.parent_id).count();
    let project = Project {
        id,
        name: input.name,
        color: input.color.unwrap_or(DEFAULT_COLOR),
        parent_id: input.parent_id,
        order: siblings as i64 + 1,
        favorite: input.favorite.unwrap_or(false),
        url: project_url(id),
        ..Default::default()
    };
    store.projects.insert(id, project.clone());
    finish_create(&mut store, req_id, &project)
}

pub async fn update_project(
    State(db): State<Db>,
    Path(id): Path<u64>,
    Json(input): Json<UpdateProject>,
) -> HandlerResult<StatusCode> {
    let mut store = db.write().await;
    let project = store.projects.get_mut(&id).ok_or_else(|| not_found("Project"))?;
    if let Some(name) = input.name {
        project.name = name;
    }
    if let Some(color) = input.color {
        project.color = color;
    }
    if let Some(favorite) = input.favorite {
        project.favorite = favorite;
    }
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_project(State(db): State<Db>, Path(id): Path<u64>) -> HandlerResult<StatusCode> {
    let mut store = db.write().await;
    if !store.projects.contains_key(&id) {
        return Err(not_found("Project"));
    }
    if id == INBOX_PROJECT_ID {
        return Err(bad_request("Inbox project cannot be deleted"));
    }

    // Sub-projects go with their parent, and everything inside them.
    let mut doomed = vec![id];
    let mut i = 0;
    while i < doomed.len() {
        let parent = doomed[i];
        doomed.extend(store.projects.values().filter(|p| p.parent_id == Some(parent)).map(|p| p.id));
        i += 1;
    }
    let tasks = store
        .tasks
        .values()
        .filter(|t| doomed.contains(&t.project_id))
        .map(|t| t.id)
        .collect();
    remove_tasks(&mut store, tasks);
    store.projects.retain(|pid, _| !doomed.contains(pid));
    store.sections.retain(|_, s| !doomed.contains(&s.project_id));
    store.comments.retain(|_, c| c.project_id.map_or(true, |pid| !doomed.contains(&pid)));
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_collaborators(State(db): State<Db>, Path(id): Path<u64>) -> HandlerResult<Json<Vec<User>>> {
    let store = db.read().await;
    if !store.projects.contains_key(&id) {
        return Err(not_found("Project"));
    }
    Ok(Json(vec![owner()]))
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

pub async fn list_sections(State(db): State<Db>, Query(filter): Query<SectionFilter>) -> Json<Vec<Section>> {
    let store = db.read().await;
    Json(
        store
            .sections
            .values()
            .filter(|s| filter.project_id.map_or(true, |pid| s.project_id == pid))
            .cloned()
            .collect(),
    )
}

pub async fn get_section(State(db): State<Db>, Path(id): Path<u64>) -> HandlerResult<Json<Section>> {
    let store = db.read().await;
    store.sections.get(&id).cloned().map(Json).ok_or_else(|| not_found("Section"))
}

pub async fn create_section(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<CreateSection>,
) -> HandlerResult<Json<Value>> {
    let req_id = request_id(&headers);
    let mut store = db.write().await;
    if let Some(previous) = store.replay(req_id) {
        return Ok(Json(previous));
    }
    if !store.projects.contains_key(&input.project_id) {
        return Err(bad_request("Project not found"));
    }

    let id = store.allocate_id();
    let existing = store.sections.values().filter(|s| s.project_id == input.project_id).count();
    let section = Section {
        id,
        project_id: input.project_id,
        order: input.order.unwrap_or(existing as i64 + 1),
        name: input.name,
    };
    store.sections.insert(id, section.clone());
    finish_create(&mut store, req_id, &section)
}

pub async fn update_section(
    State(db): State<Db>,
    Path(id): Path<u64>,
    Json(input): Json<UpdateSection>,
) -> HandlerResult<StatusCode> {
    let mut store = db.write().await;
    let section = store.sections.get_mut(&id).ok_or_else(|| not_found("Section"))?;
    section.name = input.name;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_section(State(db): State<Db>, Path(id): Path<u64>) -> HandlerResult<StatusCode> {
    let mut store = db.write().await;
    store.sections.remove(&id).ok_or_else(|| not_found("Section"))?;
    let tasks = store.tasks.values().filter(|t| t.section_id == id).map(|t| t.id).collect();
    remove_tasks(&mut store, tasks);
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

pub async fn list_tasks(State(db): State<Db>, Query(filter): Query<TaskFilter>) -> HandlerResult<Json<Vec<Task>>> {
    if filter.filter.is_some() {
        return Err(bad_request("Filter expressions are not supported by the mock server"));
    }
    let ids = match filter.ids.as_deref() {
        Some(raw) => Some(
            raw.split(',')
                .map(|s| s.trim().parse::<u64>())
                .collect::<Result<Vec<_>, _>>()
                .map_err(|_| bad_request("Invalid ids parameter"))?,
        ),
        None => None,
    };

    let store = db.read().await;
    let tasks = store
        .tasks
        .values()
        .filter(|t| !t.completed)
        .filter(|t| filter.project_id.map_or(true, |pid| t.project_id == pid))
        .filter(|t| filter.section_id.map_or(true, |sid| t.section_id == sid))
        .filter(|t| filter.label_id.map_or(true, |lid| t.label_ids.contains(&lid)))
        .filter(|t| ids.as_ref().map_or(true, |ids| ids.contains(&t.id)))
        .cloned()
        .collect();
    Ok(Json(tasks))
}

pub async fn get_task(State(db): State<Db>, Path(id): Path<u64>) -> HandlerResult<Json<Task>> {
    let store = db.read().await;
    store.tasks.get(&id).cloned().map(Json).ok_or_else(|| not_found("Task"))
}

pub async fn create_task(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<CreateTask>,
) -> HandlerResult<Json<Value>> {
    let req_id = request_id(&headers);
    let mut store = db.write().await;
    if let Some(previous) = store.replay(req_id) {
        return Ok(Json(previous));
    }

    let mut project_id = input.project_id.unwrap_or(INBOX_PROJECT_ID);
    if let Some(section_id) = input.section_id {
        let section = store.sections.get(&section_id).ok_or_else(|| bad_request("Section not found"))?;
        project_id = section.project_id;
    }
    if let Some(parent_id) = input.parent_id {
        let parent = store.tasks.get(&parent_id).ok_or_else(|| bad_request("Parent task not found"))?;
        project_id = parent.project_id;
    }
    if !store.projects.contains_key(&project_id) {
        return Err(bad_request("Project not found"));
    }
    let priority = input.priority.unwrap_or(1);
    if !(1..=4).contains(&priority) {
        return Err(bad_request("Priority must be between 1 and 4"));
    }

    let id = store.allocate_id();
    let siblings = store
        .tasks
        .values()
        .filter(|t| t.project_id == project_id && t.parent_id == input.parent_id)
        .count();
    let task = Task {
        id,
        project_id,
        section_id: input.section_id.unwrap_or(0),
        content: input.content,
        description: input.description.unwrap_or_default(),
        completed: false,
        label_ids: input.label_ids.unwrap_or_default(),
        parent_id: input.parent_id,
        order: input.order.unwrap_or(siblings as i64 + 1),
        priority,
        due: due_from(input.due_string, input.due_date, input.due_datetime),
        url: task_url(id),
        comment_count: 0,
        assignee: input.assignee,
        assigner: input.assignee.map(|_| owner().id).unwrap_or(0),
    };
    store.tasks.insert(id, task.clone());
    finish_create(&mut store, req_id, &task)
}

pub async fn update_task(
    State(db): State<Db>,
    Path(id): Path<u64>,
    Json(input): Json<UpdateTask>,
) -> HandlerResult<StatusCode> {
    let mut store = db.write().await;
    let task = store.tasks.get_mut(&id).ok_or_else(|| not_found("Task"))?;

    if let Some(priority) = input.priority {
        if !(1..=4).contains(&priority) {
            return Err(bad_request("Priority must be between 1 and 4"));
        }
        task.priority = priority;
    }
    if let Some(content) = input.content {
        task.content = content;
    }
    if let Some(description) = input.description {
        task.description = description;
    }
    if let Some(label_ids) = input.label_ids {
        task.label_ids = label_ids;
    }
    if input.due_string.is_some() || input.due_date.is_some() || input.due_datetime.is_some() {
        task.due = due_from(input.due_string, input.due_date, input.due_datetime);
    }
    match input.assignee {
        Some(0) => {
            task.assignee = None;
            task.assigner = 0;
        }
        Some(user) => {
            task.assignee = Some(user);
            task.assigner = owner().id;
        }
        None => {}
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn set_completed(db: &Db, id: u64, completed: bool) -> HandlerResult<StatusCode> {
    let mut store = db.write().await;
    let task = store.tasks.get_mut(&id).ok_or_else(|| not_found("Task"))?;
    task.completed = completed;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn close_task(State(db): State<Db>, Path(id): Path<u64>) -> HandlerResult<StatusCode> {
    set_completed(&db, id, true).await
}

pub async fn reopen_task(State(db): State<Db>, Path(id): Path<u64>) -> HandlerResult<StatusCode> {
    set_completed(&db, id, false).await
}

pub async fn delete_task(State(db): State<Db>, Path(id): Path<u64>) -> HandlerResult<StatusCode> {
    let mut store = db.write().await;
    if !store.tasks.contains_key(&id) {
        return Err(not_found("Task"));
    }
    remove_tasks(&mut store, vec![id]);
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Labels
// ---------------------------------------------------------------------------

pub async fn list_labels(State(db): State<Db>) -> Json<Vec<Label>> {
    Json(db.read().await.labels.values().cloned().collect())
}

pub async fn get_label(State(db): State<Db>, Path(id): Path<u64>) -> HandlerResult<Json<Label>> {
    let store = db.read().await;
    store.labels.get(&id).cloned().map(Json).ok_or_else(|| not_found("Label"))
}

pub async fn create_label(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<CreateLabel>,
) -> HandlerResult<Json<Value>> {
    let req_id = request_id(&headers);
    let mut store = db.write().await;
    if let Some(previous) = store.replay(req_id) {
        return Ok(Json(previous));
    }
    if store.labels.values().any(|l| l.name == input.name) {
        return Err(bad_request("Label already exists"));
    }

    let id = store.allocate_id();
    let label = Label {
        id,
        name: input.name,
        color: input.color.unwrap_or(DEFAULT_COLOR),
        order: input.order.unwrap_or(store.labels.len() as i64 + 1),
        favorite: input.favorite.unwrap_or(false),
    };
    store.labels.insert(id, label.clone());
    finish_create(&mut store, req_id, &label)
}

pub async fn update_label(
    State(db): State<Db>,
    Path(id): Path<u64>,
    Json(input): Json<UpdateLabel>,
) -> HandlerResult<StatusCode> {
    let mut store = db.write().await;
    let label = store.labels.get_mut(&id).ok_or_else(|| not_found("Label"))?;
    if let Some(name) = input.name {
        label.name = name;
    }
    if let Some(order) = input.order {
        label.order = order;
    }
    if let Some(color) = input.color {
        label.color = color;
    }
    if let Some(favorite) = input.favorite {
        label.favorite = favorite;
    }
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_label(State(db): State<Db>, Path(id): Path<u64>) -> HandlerResult<StatusCode> {
    let mut store = db.write().await;
    store.labels.remove(&id).ok_or_else(|| not_found("Label"))?;
    for task in store.tasks.values_mut() {
        task.label_ids.retain(|lid| *lid != id);
    }
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Comments
// ---------------------------------------------------------------------------

pub async fn list_comments(
    State(db): State<Db>,
    Query(filter): Query<CommentFilter>,
) -> HandlerResult<Json<Vec<Comment>>> {
    let store = db.read().await;
    let comments = match (filter.project_id, filter.task_id) {
        (Some(pid), None) => store.comments.values().filter(|c| c.project_id == Some(pid)).cloned().collect(),
        (None, Some(tid)) => store.comments.values().filter(|c| c.task_id == Some(tid)).cloned().collect(),
        _ => return Err(bad_request("Exactly one of project_id or task_id is required")),
    };
    Ok(Json(comments))
}

pub async fn get_comment(State(db): State<Db>, Path(id): Path<u64>) -> HandlerResult<Json<Comment>> {
    let store = db.read().await;
    store.comments.get(&id).cloned().map(Json).ok_or_else(|| not_found("Comment"))
}

pub async fn create_comment(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<CreateComment>,
) -> HandlerResult<Json<Value>> {
    let req_id = request_id(&headers);
    let mut store = db.write().await;
    if let Some(previous) = store.replay(req_id) {
        return Ok(Json(previous));
    }

    match (input.project_id, input.task_id) {
        (Some(pid), None) => {
            let project = store.projects.get_mut(&pid).ok_or_else(|| bad_request("Project not found"))?;
            project.comment_count += 1;
        }
        (None, Some(tid)) => {
            let task = store.tasks.get_mut(&tid).ok_or_else(|| bad_request("Task not found"))?;
            task.comment_count += 1;
        }
        _ => return Err(bad_request("Exactly one of project_id or task_id is required")),
    }

    let id = store.allocate_id();
    let comment = Comment {
        id,
        task_id: input.task_id,
        project_id: input.project_id,
        posted: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        content: input.content,
        attachment: input.attachment,
    };
    store.comments.insert(id, comment.clone());
    finish_create(&mut store, req_id, &comment)
}

pub async fn update_comment(
    State(db): State<Db>,
    Path(id): Path<u64>,
    Json(input): Json<UpdateComment>,
) -> HandlerResult<StatusCode> {
    let mut store = db.write().await;
    let comment = store.comments.get_mut(&id).ok_or_else(|| not_found("Comment"))?;
    comment.content = input.content;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_comment(State(db): State<Db>, Path(id): Path<u64>) -> HandlerResult<StatusCode> {
    let mut store = db.write().await;
    let comment = store.comments.remove(&id).ok_or_else(|| not_found("Comment"))?;
    if let Some(project) = comment.project_id.and_then(|pid| store.projects.get_mut(&pid)) {
        project.comment_count = project.comment_count.saturating_sub(1);
    }
    if let Some(task) = comment.task_id.and_then(|tid| store.tasks.get_mut(&tid)) {
        task.comment_count = task.comment_count.saturating_sub(1);
    }
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn due_from_nothing_is_none() {
        assert_eq!(due_from(None, None, None), None);
    }

    #[test]
    fn due_from_no_date_clears() {
        assert_eq!(due_from(Some("no date".to_string()), None, None), None);
    }

    #[test]
    fn due_from_datetime_derives_date() {
        let due = due_from(None, None, Some("2024-05-01T09:00:00Z".to_string())).unwrap();
        assert_eq!(due.date, "2024-05-01");
        assert_eq!(due.string, "2024-05-01");
        assert_eq!(due.datetime.as_deref(), Some("2024-05-01T09:00:00Z"));
        assert!(!due.recurring);
    }

    #[test]
    fn due_from_recurring_string() {
        let due = due_from(Some("every monday".to_string()), Some("2024-05-06".to_string()), None).unwrap();
        assert!(due.recurring);
        assert_eq!(due.string, "every monday");
        assert_eq!(due.date, "2024-05-06");
    }
}
