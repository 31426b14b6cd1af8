//! Course content management: courses, lectures, exams and materials.

use crate::extractors::{Auth, MultipartForm};
use crate::responses::{page, see_other, AppError, AppResult};
use crate::state::DashboardState;
use crate::views;
use axum::{
    extract::{Path, State},
    response::{Html, IntoResponse, Response},
    Form,
};
use rehla_core::{CoursePatch, ExamPatch, LecturePatch, MaterialPatch, RehlaError};
use rehla_service::{CourseUpdate, ExamUpdate, MaterialUpdate, NewCourse, NewExam, NewLecture, NewMaterial};

fn required_order(form: &MultipartForm) -> Result<i64, AppError> {
    form.number("order")?
        .ok_or_else(|| AppError(RehlaError::validation("order shouldn't be empty")))
}

// ============ Courses ============

pub(super) async fn courses(State(state): State<DashboardState>, auth: Auth) -> AppResult<Html<String>> {
    let staff = auth.user()?;
    let courses = state.course_service.list_courses().await?;
    Ok(page(views::dashboard::courses(staff, &courses)))
}

pub(super) async fn create_course(
    State(state): State<DashboardState>,
    mut form: MultipartForm,
) -> AppResult<Response> {
    let request = NewCourse {
        title: form.text("title").to_string(),
        description: form.text("description").to_string(),
        teacher: form.text("teacher").to_string(),
        price: form.number("price")?.unwrap_or_default(),
        active: form.flag("active"),
        free: form.flag("free"),
        cover: form.take_file("cover"),
        teacher_img: form.take_file("teacher_img"),
    };
    let course_id = state.course_service.create_course(request).await?;
    Ok(see_other(&format!("/courses/{}", course_id)).into_response())
}

pub(super) async fn course(
    State(state): State<DashboardState>,
    auth: Auth,
    Path(course_id): Path<String>,
) -> AppResult<Html<String>> {
    let staff = auth.user()?;
    let overview = state.course_service.get_overview(&course_id).await?;
    Ok(page(views::dashboard::course(staff, &overview)))
}

/// The edit form always carries both checkboxes, so an absent one is off.
pub(super) async fn update_course(
    State(state): State<DashboardState>,
    Path(course_id): Path<String>,
    mut form: MultipartForm,
) -> AppResult<Response> {
    let update = CourseUpdate {
        patch: CoursePatch {
            title: form.opt_text("title"),
            description: Some(form.text("description").to_string()),
            teacher: Some(form.text("teacher").to_string()),
            price: form.number("price")?,
            active: Some(form.flag("active")),
            free: Some(form.flag("free")),
            ..CoursePatch::default()
        },
        cover: form.take_file("cover"),
        teacher_img: form.take_file("teacher_img"),
    };
    state.course_service.update_course(&course_id, update).await?;
    Ok(see_other(&format!("/courses/{}", course_id)).into_response())
}

pub(super) async fn delete_course(
    State(state): State<DashboardState>,
    Path(course_id): Path<String>,
) -> AppResult<Response> {
    state.course_service.delete_course(&course_id).await?;
    Ok(see_other("/courses").into_response())
}

// ============ Lectures ============

pub(super) async fn lectures(
    State(state): State<DashboardState>,
    auth: Auth,
    Path(course_id): Path<String>,
) -> AppResult<Html<String>> {
    let staff = auth.user()?;
    let lectures = state.lecture_service.list_lectures(&course_id).await?;
    Ok(page(views::dashboard::lectures(staff, &course_id, &lectures)))
}

pub(super) async fn create_lecture(
    State(state): State<DashboardState>,
    Path(course_id): Path<String>,
    Form(request): Form<NewLecture>,
) -> AppResult<Response> {
    state.lecture_service.create_lecture(&course_id, request).await?;
    Ok(see_other(&format!("/courses/{}/lecs", course_id)).into_response())
}

pub(super) async fn lecture(
    State(state): State<DashboardState>,
    auth: Auth,
    Path((course_id, lecture_id)): Path<(String, String)>,
) -> AppResult<Html<String>> {
    let staff = auth.user()?;
    let lecture = state.lecture_service.get_lecture(&course_id, &lecture_id).await?;
    Ok(page(views::dashboard::lecture(staff, &course_id, &lecture)))
}

pub(super) async fn update_lecture(
    State(state): State<DashboardState>,
    Path((course_id, lecture_id)): Path<(String, String)>,
    Form(patch): Form<LecturePatch>,
) -> AppResult<Response> {
    let patch = LecturePatch {
        free: Some(patch.free.unwrap_or(false)),
        ..patch
    };
    state
        .lecture_service
        .update_lecture(&course_id, &lecture_id, patch)
        .await?;
    Ok(see_other(&format!("/courses/{}/lecs/{}", course_id, lecture_id)).into_response())
}

pub(super) async fn delete_lecture(
    State(state): State<DashboardState>,
    Path((course_id, lecture_id)): Path<(String, String)>,
) -> AppResult<Response> {
    state.lecture_service.delete_lecture(&course_id, &lecture_id).await?;
    Ok(see_other(&format!("/courses/{}/lecs", course_id)).into_response())
}

// ============ Exams ============

pub(super) async fn exams(
    State(state): State<DashboardState>,
    auth: Auth,
    Path(course_id): Path<String>,
) -> AppResult<Html<String>> {
    let staff = auth.user()?;
    let exams = state.exam_service.list_exams(&course_id).await?;
    Ok(page(views::dashboard::exams(staff, &course_id, &exams)))
}

pub(super) async fn create_exam(
    State(state): State<DashboardState>,
    Path(course_id): Path<String>,
    mut form: MultipartForm,
) -> AppResult<Response> {
    let request = NewExam {
        title: form.text("title").to_string(),
        order: required_order(&form)?,
        file: form.require_file("file")?,
    };
    state.exam_service.create_exam(&course_id, request).await?;
    Ok(see_other(&format!("/courses/{}/exams", course_id)).into_response())
}

pub(super) async fn exam(
    State(state): State<DashboardState>,
    auth: Auth,
    Path((course_id, exam_id)): Path<(String, String)>,
) -> AppResult<Html<String>> {
    let staff = auth.user()?;
    let exam = state.exam_service.get_exam(&course_id, &exam_id).await?;
    Ok(page(views::dashboard::exam(staff, &course_id, &exam)))
}

pub(super) async fn update_exam(
    State(state): State<DashboardState>,
    Path((course_id, exam_id)): Path<(String, String)>,
    mut form: MultipartForm,
) -> AppResult<Response> {
    let update = ExamUpdate {
        patch: ExamPatch {
            title: form.opt_text("title"),
            order: form.number("order")?,
        },
        file: form.take_file("file"),
    };
    state.exam_service.update_exam(&course_id, &exam_id, update).await?;
    Ok(see_other(&format!("/courses/{}/exams/{}", course_id, exam_id)).into_response())
}

pub(super) async fn delete_exam(
    State(state): State<DashboardState>,
    Path((course_id, exam_id)): Path<(String, String)>,
) -> AppResult<Response> {
    state.exam_service.delete_exam(&course_id, &exam_id).await?;
    Ok(see_other(&format!("/courses/{}/exams", course_id)).into_response())
}

// ============ Materials ============

pub(super) async fn materials(
    State(state): State<DashboardState>,
    auth: Auth,
    Path(course_id): Path<String>,
) -> AppResult<Html<String>> {
    let staff = auth.user()?;
    let materials = state.material_service.list_materials(&course_id).await?;
    Ok(page(views::dashboard::materials(staff, &course_id, &materials)))
}

pub(super) async fn create_material(
    State(state): State<DashboardState>,
    Path(course_id): Path<String>,
    mut form: MultipartForm,
) -> AppResult<Response> {
    let request = NewMaterial {
        title: form.text("title").to_string(),
        order: required_order(&form)?,
        free: form.flag("free"),
        file: form.require_file("file")?,
    };
    state.material_service.create_material(&course_id, request).await?;
    Ok(see_other(&format!("/courses/{}/mats", course_id)).into_response())
}

pub(super) async fn material(
    State(state): State<DashboardState>,
    auth: Auth,
    Path((course_id, material_id)): Path<(String, String)>,
) -> AppResult<Html<String>> {
    let staff = auth.user()?;
    let material = state.material_service.get_material(&course_id, &material_id).await?;
    Ok(page(views::dashboard::material(staff, &course_id, &material)))
}

pub(super) async fn update_material(
    State(state): State<DashboardState>,
    Path((course_id, material_id)): Path<(String, String)>,
    mut form: MultipartForm,
) -> AppResult<Response> {
    let update = MaterialUpdate {
        patch: MaterialPatch {
            title: form.opt_text("title"),
            order: form.number("order")?,
            free: Some(form.flag("free")),
        },
        file: form.take_file("file"),
    };
    state
        .material_service
        .update_material(&course_id, &material_id, update)
        .await?;
    Ok(see_other(&format!("/courses/{}/mats/{}", course_id, material_id)).into_response())
}

pub(super) async fn delete_material(
    State(state): State<DashboardState>,
    Path((course_id, material_id)): Path<(String, String)>,
) -> AppResult<Response> {
    state
        .material_service
        .delete_material(&course_id, &material_id)
        .await?;
    Ok(see_other(&format!("/courses/{}/mats", course_id)).into_response())
}
