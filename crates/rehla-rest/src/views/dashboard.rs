//! Pages of the staff dashboard.
//!
//! Forms use htmx so that PATCH and DELETE reach the routes directly.

use super::{details, e, empty, html_page};
use rehla_core::{
    Course, CourseOverview, DashboardUser, Exam, ExamAnswers, Lecture, Material, Payment, Subscription,
    SubmittedAnswer, User,
};
use rehla_security::Principal;

const SITE: &str = "Rehla Dashboard";

fn nav(staff: &Principal) -> String {
    let mut nav = String::from("<a href=\"/\">Home</a> <a href=\"/correct\">Correct</a>");
    if staff.is_admin() {
        nav.push_str(
            " <a href=\"/courses\">Courses</a> <a href=\"/users\">Users</a> \
             <a href=\"/staff\">Staff</a> <a href=\"/cache\">Cache</a>",
        );
    }
    nav.push_str(&format!(
        " <span>{} ({})</span> <button hx-post=\"/logout\">Log out</button>",
        e(&staff.name),
        staff.role
    ));
    nav
}

fn page(staff: &Principal, title: &str, content: &str) -> String {
    html_page(SITE, title, &nav(staff), content)
}

fn checked(value: bool) -> &'static str {
    if value {
        " checked"
    } else {
        ""
    }
}

fn delete_button(url: &str) -> String {
    format!(
        "<button hx-delete=\"{}\" hx-confirm=\"Delete?\" hx-target=\"body\">Delete</button>",
        e(url)
    )
}

pub fn login(error: Option<&str>) -> String {
    let alert = error.map_or_else(String::new, |m| format!("<p class=\"alert-error\">{}</p>", e(m)));
    let content = format!(
        "<h1>Dashboard login</h1>{}<form method=\"post\" action=\"/login\">\
         <input name=\"username\" required><input type=\"password\" name=\"password\" required>\
         <button>Log in</button></form>",
        alert
    );
    html_page(SITE, "Login", "", &content)
}

pub fn home(staff: &Principal) -> String {
    let content = format!("<h1>Welcome, {}</h1>", e(&staff.name));
    page(staff, "Home", &content)
}

pub fn courses(staff: &Principal, courses: &[Course]) -> String {
    let mut content = String::from("<h1>Courses</h1>");
    if courses.is_empty() {
        content.push_str(&empty("No courses yet"));
    } else {
        content.push_str("<table><tr><th>Title</th><th>Teacher</th><th>Price</th><th>Active</th><th>Free</th></tr>");
        for course in courses {
            content.push_str(&format!(
                "<tr><td><a href=\"/courses/{}\">{}</a></td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                e(&course.id),
                e(&course.title),
                e(&course.teacher),
                course.price,
                course.active,
                course.free
            ));
        }
        content.push_str("</table>");
    }
    content.push_str(
        "<h2>New course</h2><form hx-post=\"/courses\" hx-encoding=\"multipart/form-data\" hx-target=\"body\">\
         <input name=\"title\" placeholder=\"Title\" required>\
         <textarea name=\"description\" placeholder=\"Description\"></textarea>\
         <input name=\"teacher\" placeholder=\"Teacher\">\
         <input type=\"number\" name=\"price\" min=\"0\" value=\"0\">\
         <label><input type=\"checkbox\" name=\"active\"> Active</label>\
         <label><input type=\"checkbox\" name=\"free\"> Free</label>\
         <input type=\"file\" name=\"cover\" accept=\"image/*\">\
         <input type=\"file\" name=\"teacher_img\" accept=\"image/*\">\
         <button>Create</button></form>",
    );
    page(staff, "Courses", &content)
}

pub fn course(staff: &Principal, overview: &CourseOverview) -> String {
    let course = &overview.course;
    let id = e(&course.id);
    let content = format!(
        "<h1>{title}</h1>{details}\
         <form hx-patch=\"/courses/{id}\" hx-encoding=\"multipart/form-data\" hx-target=\"body\">\
         <input name=\"title\" value=\"{title}\">\
         <textarea name=\"description\">{description}</textarea>\
         <input name=\"teacher\" value=\"{teacher}\">\
         <input type=\"number\" name=\"price\" min=\"0\" value=\"{price}\">\
         <label><input type=\"checkbox\" name=\"active\"{active}> Active</label>\
         <label><input type=\"checkbox\" name=\"free\"{free}> Free</label>\
         <input type=\"file\" name=\"cover\" accept=\"image/*\">\
         <input type=\"file\" name=\"teacher_img\" accept=\"image/*\">\
         <button>Save</button></form>{delete}\
         <p><a href=\"/courses/{id}/lecs\">Lectures ({lecs})</a> \
         <a href=\"/courses/{id}/exams\">Exams ({exams})</a> \
         <a href=\"/courses/{id}/mats\">Materials</a></p>",
        title = e(&course.title),
        details = details(&[
            ("Video folder", course.folder_id.clone()),
            ("Lectures", course.number_of_lecs.to_string()),
        ]),
        id = id,
        description = e(&course.description),
        teacher = e(&course.teacher),
        price = course.price,
        active = checked(course.active),
        free = checked(course.free),
        delete = delete_button(&format!("/courses/{}", course.id)),
        lecs = overview.lectures.len(),
        exams = overview.exams.len(),
    );
    page(staff, &course.title, &content)
}

pub fn lectures(staff: &Principal, course_id: &str, lectures: &[Lecture]) -> String {
    let cid = e(course_id);
    let mut content = String::from("<h1>Lectures</h1><ol>");
    for lecture in lectures {
        content.push_str(&format!(
            "<li value=\"{}\"><a href=\"/courses/{}/lecs/{}\">{}</a>{}</li>",
            lecture.order,
            cid,
            e(&lecture.id),
            e(&lecture.title),
            if lecture.free { " (free)" } else { "" }
        ));
    }
    content.push_str(&format!(
        "</ol><h2>New lecture</h2><form hx-post=\"/courses/{}/lecs\" hx-target=\"body\">\
         <input name=\"title\" required><textarea name=\"description\"></textarea>\
         <input type=\"number\" name=\"order\" min=\"1\" required>\
         <input name=\"video_url\" placeholder=\"Video id\" required>\
         <label><input type=\"checkbox\" name=\"free\" value=\"true\"> Free</label>\
         <button>Add</button></form>",
        cid
    ));
    page(staff, "Lectures", &content)
}

pub fn lecture(staff: &Principal, course_id: &str, lecture: &Lecture) -> String {
    let url = format!("/courses/{}/lecs/{}", course_id, lecture.id);
    let content = format!(
        "<h1>{title}</h1><form hx-patch=\"{url}\" hx-target=\"body\">\
         <input name=\"title\" value=\"{title}\"><textarea name=\"description\">{description}</textarea>\
         <input type=\"number\" name=\"order\" min=\"1\" value=\"{order}\">\
         <input name=\"video_url\" value=\"{video}\">\
         <label><input type=\"checkbox\" name=\"free\" value=\"true\"{free}> Free</label>\
         <button>Save</button></form>{delete}",
        title = e(&lecture.title),
        url = e(&url),
        description = e(&lecture.description),
        order = lecture.order,
        video = e(&lecture.video_url),
        free = checked(lecture.free),
        delete = delete_button(&url),
    );
    page(staff, &lecture.title, &content)
}

fn file_form(action: &str, verb: &str, title: &str, order: Option<i64>, free: Option<bool>, required: bool) -> String {
    let free = free.map_or_else(String::new, |f| {
        format!("<label><input type=\"checkbox\" name=\"free\"{}> Free</label>", checked(f))
    });
    format!(
        "<form hx-{verb}=\"{action}\" hx-encoding=\"multipart/form-data\" hx-target=\"body\">\
         <input name=\"title\" value=\"{title}\"{req}>\
         <input type=\"number\" name=\"order\" min=\"1\" value=\"{order}\"{req}>{free}\
         <input type=\"file\" name=\"file\" accept=\"application/pdf\"{req}>\
         <button>Save</button></form>",
        verb = verb,
        action = e(action),
        title = e(title),
        order = order.map_or_else(String::new, |o| o.to_string()),
        req = if required { " required" } else { "" },
        free = free,
    )
}

pub fn exams(staff: &Principal, course_id: &str, exams: &[Exam]) -> String {
    let mut content = String::from("<h1>Exams</h1><ol>");
    for exam in exams {
        content.push_str(&format!(
            "<li value=\"{}\"><a href=\"/courses/{}/exams/{}\">{}</a></li>",
            exam.order,
            e(course_id),
            e(&exam.id),
            e(&exam.title)
        ));
    }
    content.push_str("</ol><h2>New exam</h2>");
    content.push_str(&file_form(&format!("/courses/{}/exams", course_id), "post", "", None, None, true));
    page(staff, "Exams", &content)
}

pub fn exam(staff: &Principal, course_id: &str, exam: &Exam) -> String {
    let url = format!("/courses/{}/exams/{}", course_id, exam.id);
    let content = format!(
        "<h1>{}</h1><a href=\"{}\">Download sheet</a>{}{}",
        e(&exam.title),
        e(&exam.url),
        file_form(&url, "patch", &exam.title, Some(exam.order), None, false),
        delete_button(&url)
    );
    page(staff, &exam.title, &content)
}

pub fn materials(staff: &Principal, course_id: &str, materials: &[Material]) -> String {
    let mut content = String::from("<h1>Materials</h1><ol>");
    for material in materials {
        content.push_str(&format!(
            "<li value=\"{}\"><a href=\"/courses/{}/mats/{}\">{}</a>{}</li>",
            material.order,
            e(course_id),
            e(&material.id),
            e(&material.title),
            if material.free { " (free)" } else { "" }
        ));
    }
    content.push_str("</ol><h2>New material</h2>");
    content.push_str(&file_form(&format!("/courses/{}/mats", course_id), "post", "", None, Some(false), true));
    page(staff, "Materials", &content)
}

pub fn material(staff: &Principal, course_id: &str, material: &Material) -> String {
    let url = format!("/courses/{}/mats/{}", course_id, material.id);
    let content = format!(
        "<h1>{}</h1><a href=\"{}\">Download file</a>{}{}",
        e(&material.title),
        e(&material.url),
        file_form(&url, "patch", &material.title, Some(material.order), Some(material.free), false),
        delete_button(&url)
    );
    page(staff, &material.title, &content)
}

pub fn users(staff: &Principal, users: &[User]) -> String {
    let mut content = String::from("<h1>Users</h1>");
    if users.is_empty() {
        content.push_str(&empty("No users yet"));
    } else {
        content.push_str("<table><tr><th>Name</th><th>Phone</th><th>Parent phone</th></tr>");
        for user in users {
            content.push_str(&format!(
                "<tr><td><a href=\"/users/{}\">{}</a></td><td>{}</td><td>{}</td></tr>",
                e(&user.id),
                e(&user.full_name()),
                e(&user.phone_number),
                e(&user.parent_phone_number)
            ));
        }
        content.push_str("</table>");
    }
    content.push_str(
        "<h2>New user</h2><form hx-post=\"/users\" hx-target=\"body\">\
         <input name=\"firstname\" required><input name=\"lastname\" required>\
         <input name=\"phone_number\" required><input name=\"parent_phone_number\" required>\
         <input type=\"password\" name=\"password\" minlength=\"8\" required>\
         <button>Create</button></form>",
    );
    page(staff, "Users", &content)
}

/// A subscription with its payments, newest first.
pub type SubscriptionPayments = (Subscription, Vec<Payment>);

pub fn user(staff: &Principal, user: &User, subscriptions: &[SubscriptionPayments], courses: &[Course]) -> String {
    let uid = e(&user.id);
    let mut content = format!(
        "<h1>{name}</h1><form hx-patch=\"/users/{uid}\" hx-target=\"body\">\
         <input name=\"firstname\" value=\"{first}\"><input name=\"lastname\" value=\"{last}\">\
         <input name=\"phone_number\" value=\"{phone}\">\
         <input name=\"parent_phone_number\" value=\"{parent}\">\
         <button>Save</button></form>{delete}<h2>Subscriptions</h2>",
        name = e(&user.full_name()),
        uid = uid,
        first = e(&user.firstname),
        last = e(&user.lastname),
        phone = e(&user.phone_number),
        parent = e(&user.parent_phone_number),
        delete = delete_button(&format!("/users/{}", user.id)),
    );

    for (subscription, payments) in subscriptions {
        let sub_url = format!("/users/{}/subs/{}", user.id, subscription.id);
        content.push_str(&format!(
            "<section><h3>{}</h3><form hx-patch=\"{}\" hx-target=\"body\">\
             <label><input type=\"checkbox\" name=\"active\" value=\"true\"{}> Active</label>\
             <button>Save</button></form>{}<table><tr><th>Amount</th><th>Paid</th><th>Valid until</th><th></th></tr>",
            e(&subscription.course_title),
            e(&sub_url),
            checked(subscription.active),
            delete_button(&sub_url)
        ));
        for payment in payments {
            content.push_str(&format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                payment.amount_paid,
                payment.date_of_payment.format("%Y-%m-%d"),
                payment.valid_until.format("%Y-%m-%d"),
                delete_button(&format!("{}/payments/{}", sub_url, payment.id))
            ));
        }
        content.push_str(&format!(
            "</table><form hx-post=\"{}/payments\" hx-target=\"body\">\
             <input type=\"number\" name=\"amount_paid\" min=\"0\" required>\
             <input type=\"date\" name=\"valid_until\" required>\
             <button>Add payment</button></form></section>",
            e(&sub_url)
        ));
    }

    content.push_str(&format!(
        "<h2>New subscription</h2><form hx-post=\"/users/{}/subs\" hx-target=\"body\"><select name=\"course_id\">",
        uid
    ));
    for course in courses {
        content.push_str(&format!("<option value=\"{}\">{}</option>", e(&course.id), e(&course.title)));
    }
    content.push_str(
        "</select><label><input type=\"checkbox\" name=\"active\" value=\"true\"> Active</label>\
         <button>Subscribe</button></form>",
    );
    page(staff, &user.full_name(), &content)
}

pub fn staff(current: &Principal, staff: &[DashboardUser]) -> String {
    let mut content = String::from("<h1>Staff</h1><table><tr><th>Username</th><th>Role</th><th>Courses</th><th></th></tr>");
    for member in staff {
        content.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            e(&member.username),
            member.role,
            e(&member.course_ids.join(", ")),
            if member.id == current.user_id {
                String::new()
            } else {
                delete_button(&format!("/staff/{}", member.id))
            }
        ));
    }
    content.push_str(
        "</table><h2>New staff account</h2><form hx-post=\"/staff\" hx-target=\"body\">\
         <input name=\"username\" required><input type=\"password\" name=\"password\" minlength=\"8\" required>\
         <select name=\"role\"><option value=\"corrector\">Corrector</option><option value=\"admin\">Admin</option></select>\
         <input name=\"course_ids\" placeholder=\"course ids, comma separated\">\
         <button>Create</button></form>",
    );
    page(current, "Staff", &content)
}

pub fn cache(staff: &Principal, enabled: bool, courses: &[Course], status: Option<&str>) -> String {
    let mut content = String::from("<h1>Cache</h1>");
    if !enabled {
        content.push_str("<p class=\"alert-error\">The cache is disabled; refreshes have no effect.</p>");
    }
    if let Some(status) = status {
        content.push_str(&format!("<p class=\"status\">{}</p>", e(status)));
    }
    content.push_str("<table><tr><th>Course</th><th colspan=\"4\"></th></tr>");
    for course in courses {
        let base = format!("/cache/courses/{}", course.id);
        content.push_str(&format!("<tr><td>{}</td>", e(&course.title)));
        for (suffix, label) in [("", "Course"), ("/lecs", "Lectures"), ("/exams", "Exams"), ("/mats", "Materials")] {
            content.push_str(&format!(
                "<td><form method=\"post\" action=\"{}{}\"><button>{}</button></form></td>",
                e(&base),
                suffix,
                label
            ));
        }
        content.push_str("</tr>");
    }
    content.push_str("</table>");
    page(staff, "Cache", &content)
}

pub fn correct_courses(staff: &Principal, courses: &[Course]) -> String {
    let mut content = String::from("<h1>Correct</h1><ul>");
    for course in courses {
        content.push_str(&format!(
            "<li><a href=\"/correct/{}\">{}</a></li>",
            e(&course.id),
            e(&course.title)
        ));
    }
    content.push_str("</ul>");
    page(staff, "Correct", &content)
}

pub fn correct_exams(staff: &Principal, course: &Course, exams: &[Exam]) -> String {
    let mut content = format!("<h1>{}</h1><ol>", e(&course.title));
    for exam in exams {
        content.push_str(&format!(
            "<li><a href=\"/correct/{}/{}\">{}</a></li>",
            e(&course.id),
            e(&exam.id),
            e(&exam.title)
        ));
    }
    content.push_str("</ol>");
    page(staff, &course.title, &content)
}

fn answer_rows(course_id: &str, exam_id: &str, answers: &[SubmittedAnswer]) -> String {
    if answers.is_empty() {
        return empty("None");
    }
    let mut html = String::from("<ul>");
    for submitted in answers {
        html.push_str(&format!(
            "<li><a href=\"/correct/{}/{}/{}\">{}</a> {}</li>",
            e(course_id),
            e(exam_id),
            e(&submitted.user_id),
            e(&submitted.user_name),
            submitted.answer.date_of_submission.format("%Y-%m-%d %H:%M")
        ));
    }
    html.push_str("</ul>");
    html
}

pub fn correct_answers(staff: &Principal, course_id: &str, exam_id: &str, answers: &ExamAnswers) -> String {
    let content = format!(
        "<h1>Answers</h1><h2>Waiting ({})</h2>{}<h2>Corrected ({})</h2>{}",
        answers.uncorrected.len(),
        answer_rows(course_id, exam_id, &answers.uncorrected),
        answers.corrected.len(),
        answer_rows(course_id, exam_id, &answers.corrected)
    );
    page(staff, "Answers", &content)
}

pub fn correct_answer(staff: &Principal, course_id: &str, exam_id: &str, submitted: &SubmittedAnswer) -> String {
    let answer = &submitted.answer;
    let content = format!(
        "<h1>{name}</h1><h2>{exam}</h2><a href=\"{url}\" target=\"_blank\">Open answer</a>\
         <form hx-patch=\"/correct/{cid}/{eid}/{uid}\" hx-target=\"body\">\
         <input type=\"number\" name=\"grade\" min=\"0\" value=\"{grade}\" required>\
         <input type=\"number\" name=\"out_of\" min=\"1\" value=\"{out_of}\" required>\
         <textarea name=\"notes\">{notes}</textarea><button>Save</button></form>",
        name = e(&submitted.user_name),
        exam = e(&answer.exam_title),
        url = e(&answer.url),
        cid = e(course_id),
        eid = e(exam_id),
        uid = e(&submitted.user_id),
        grade = answer.grade,
        out_of = if answer.out_of > 0 { answer.out_of } else { 10 },
        notes = e(&answer.notes),
    );
    page(staff, &answer.exam_title, &content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rehla_core::Role;

    fn principal(role: Role) -> Principal {
        Principal {
            user_id: "s1".to_string(),
            name: "noor".to_string(),
            role,
            course_ids: Vec::new(),
        }
    }

    #[test]
    fn test_corrector_nav_hides_admin_links() {
        let html = home(&principal(Role::Corrector));
        assert!(html.contains("/correct"));
        assert!(!html.contains("/cache"));
        assert!(home(&principal(Role::Admin)).contains("/cache"));
    }

    #[test]
    fn test_cache_page_lists_refresh_actions() {
        let courses = vec![Course {
            id: "c1".to_string(),
            title: "Physics".to_string(),
            ..Course::default()
        }];
        let html = cache(&principal(Role::Admin), true, &courses, Some("Refreshed 3 lectures"));
        assert!(html.contains("/cache/courses/c1/lecs"));
        assert!(html.contains("Refreshed 3 lectures"));
    }

    #[test]
    fn test_login_shows_escaped_error() {
        assert!(login(Some("<bad>")).contains("&lt;bad&gt;"));
    }
}
