//! Pages of the public web site.

use super::{details, e, empty, html_page};
use chrono::{DateTime, Utc};
use rehla_core::{Answer, Course, CourseOverview, Exam, Lecture, Material, Payment, Subscription, User};
use rehla_security::Principal;

const SITE: &str = "Rehla";

fn nav(user: Option<&Principal>) -> String {
    let mut nav = String::from(
        "<a href=\"/\">الرئيسية</a> <a href=\"/courses\">الدورات</a> \
         <a href=\"/materials\">الملازم</a> <a href=\"/progress\">الدرجات</a>",
    );
    match user {
        Some(user) => nav.push_str(&format!(
            " <a href=\"/mycourses\">دوراتي</a> <a href=\"/payments\">المدفوعات</a> \
             <a href=\"/myprofile\">{}</a> <button hx-post=\"/logout\">خروج</button>",
            e(&user.name)
        )),
        None => nav.push_str(" <a href=\"/login\">دخول</a> <a href=\"/signup\">حساب جديد</a>"),
    }
    nav
}

fn page(user: Option<&Principal>, title: &str, content: &str) -> String {
    html_page(SITE, title, &nav(user), content)
}

fn date(value: &DateTime<Utc>) -> String {
    value.format("%Y-%m-%d").to_string()
}

fn course_cards(courses: &[Course], href: impl Fn(&Course) -> String) -> String {
    if courses.is_empty() {
        return empty("لا توجد دورات");
    }
    let mut html = String::from("<ul class=\"courses\">");
    for course in courses {
        html.push_str(&format!(
            "<li><a href=\"{}\"><img src=\"{}\" alt=\"\"><h3>{}</h3><p>{}</p></a></li>",
            e(&href(course)),
            e(&course.cover),
            e(&course.title),
            e(&course.teacher)
        ));
    }
    html.push_str("</ul>");
    html
}

pub fn home(user: Option<&Principal>, courses: &[Course]) -> String {
    let greeting = user.map_or_else(String::new, |u| format!("<p>أهلاً {}</p>", e(&u.name)));
    let content = format!(
        "<h1>رحلة</h1>{}<h2>الدورات</h2>{}",
        greeting,
        course_cards(courses, |c| format!("/courses/{}", c.id))
    );
    page(user, "الرئيسية", &content)
}

pub fn courses(user: Option<&Principal>, courses: &[Course]) -> String {
    let content = format!("<h1>الدورات</h1>{}", course_cards(courses, |c| format!("/courses/{}", c.id)));
    page(user, "الدورات", &content)
}

pub fn course(user: Option<&Principal>, overview: &CourseOverview, subscribed: bool) -> String {
    let course = &overview.course;
    let mut content = format!(
        "<h1>{}</h1><img src=\"{}\" alt=\"\"><p>{}</p><p>{} <img src=\"{}\" alt=\"\"></p><p>{} IQD</p>",
        e(&course.title),
        e(&course.cover),
        e(&course.description),
        e(&course.teacher),
        e(&course.teacher_img),
        course.price
    );
    if !subscribed {
        content.push_str("<p class=\"notice\">المحاضرات الثلاث الأولى مجانية</p>");
    }

    content.push_str("<h2>المحاضرات</h2><ol class=\"lectures\">");
    for lecture in &overview.lectures {
        let locked = !subscribed && !lecture.is_preview();
        content.push_str(&format!(
            "<li class=\"{}\"><a href=\"/courses/{}/lec/{}\">{}</a></li>",
            if locked { "locked" } else { "open" },
            e(&course.id),
            e(&lecture.id),
            e(&lecture.title)
        ));
    }
    content.push_str("</ol><h2>الامتحانات</h2><ol class=\"exams\">");
    for exam in &overview.exams {
        content.push_str(&format!(
            "<li><a href=\"/courses/{}/exam/{}\">{}</a></li>",
            e(&course.id),
            e(&exam.id),
            e(&exam.title)
        ));
    }
    content.push_str("</ol>");
    page(user, &course.title, &content)
}

pub fn lecture(user: Option<&Principal>, lecture: &Lecture) -> String {
    let content = format!(
        "<h1>{}</h1><div class=\"video\"><iframe src=\"https://fast.wistia.net/embed/iframe/{}\" \
         allow=\"autoplay; fullscreen\" allowfullscreen></iframe></div><p>{}</p>",
        e(&lecture.title),
        e(&lecture.video_url),
        e(&lecture.description)
    );
    page(user, &lecture.title, &content)
}

pub fn exam(user: Option<&Principal>, course_id: &str, exam: &Exam, answer: Option<&Answer>) -> String {
    let mut content = format!(
        "<h1>{}</h1><a href=\"{}\" download>تحميل الأسئلة</a>",
        e(&exam.title),
        e(&exam.url)
    );
    match answer {
        Some(answer) => content.push_str(&format!(
            "<p>تم إرسال الإجابة بتاريخ {}</p><a href=\"/progress/{}/{}\">عرض الإجابة</a>",
            date(&answer.date_of_submission),
            e(course_id),
            e(&exam.id)
        )),
        None => content.push_str(&format!(
            "<form hx-post=\"/answers/{}/{}\" hx-encoding=\"multipart/form-data\">\
             <input type=\"file\" name=\"answer\" accept=\"image/jpeg,image/png,application/pdf\" required>\
             <button>إرسال الإجابة</button></form>",
            e(course_id),
            e(&exam.id)
        )),
    }
    page(user, &exam.title, &content)
}

pub fn materials(user: Option<&Principal>, subscribed: &[Course]) -> String {
    let content = format!(
        "<h1>الملازم</h1><a href=\"/materials/free\">الملازم المجانية</a>{}",
        course_cards(subscribed, |c| format!("/materials/{}", c.id))
    );
    page(user, "الملازم", &content)
}

pub fn material_list(user: Option<&Principal>, title: &str, materials: &[Material]) -> String {
    let mut content = format!("<h1>{}</h1>", e(title));
    if materials.is_empty() {
        content.push_str(&empty("لا توجد ملازم"));
    } else {
        content.push_str("<ol class=\"materials\">");
        for material in materials {
            content.push_str(&format!(
                "<li><a href=\"{}\" download>{}</a></li>",
                e(&material.url),
                e(&material.title)
            ));
        }
        content.push_str("</ol>");
    }
    page(user, title, &content)
}

pub fn progress(user: Option<&Principal>, subscribed: &[Course]) -> String {
    let content = format!(
        "<h1>الدرجات</h1>{}",
        course_cards(subscribed, |c| format!("/progress/{}", c.id))
    );
    page(user, "الدرجات", &content)
}

pub fn grades(user: Option<&Principal>, course: &Course, answers: &[Answer]) -> String {
    let mut content = format!("<h1>{}</h1>", e(&course.title));
    if answers.is_empty() {
        content.push_str(&empty("لم ترسل أي إجابة بعد"));
    } else {
        content.push_str("<table class=\"grades\"><tr><th>الامتحان</th><th>الدرجة</th><th></th></tr>");
        for answer in answers {
            let grade = if answer.corrected {
                format!("{} / {}", answer.grade, answer.out_of)
            } else {
                "قيد التصحيح".to_string()
            };
            content.push_str(&format!(
                "<tr><td>{}</td><td>{}</td><td><a href=\"/progress/{}/{}\">عرض</a></td></tr>",
                e(&answer.exam_title),
                grade,
                e(&course.id),
                e(&answer.id)
            ));
        }
        content.push_str("</table>");
    }
    page(user, &course.title, &content)
}

pub fn answer(user: Option<&Principal>, answer: &Answer) -> String {
    let mut rows = vec![
        ("الامتحان", answer.exam_title.clone()),
        ("تاريخ الإرسال", date(&answer.date_of_submission)),
    ];
    if answer.corrected {
        rows.push(("الدرجة", format!("{} / {}", answer.grade, answer.out_of)));
        rows.push(("الملاحظات", answer.notes.clone()));
    }
    let content = format!(
        "<h1>{}</h1>{}<a href=\"{}\" download>تحميل الإجابة</a>",
        e(&answer.exam_title),
        details(&rows),
        e(&answer.url)
    );
    page(user, &answer.exam_title, &content)
}

pub fn payments(user: Option<&Principal>, subscriptions: &[Subscription]) -> String {
    let mut content = String::from("<h1>المدفوعات</h1>");
    if subscriptions.is_empty() {
        content.push_str(&empty("لا توجد اشتراكات"));
    } else {
        content.push_str("<ul class=\"subscriptions\">");
        for subscription in subscriptions {
            content.push_str(&format!(
                "<li><a href=\"/payments/{}\">{}</a> {}</li>",
                e(&subscription.id),
                e(&subscription.course_title),
                if subscription.active { "فعال" } else { "غير فعال" }
            ));
        }
        content.push_str("</ul>");
    }
    page(user, "المدفوعات", &content)
}

pub fn payment_history(user: Option<&Principal>, course: &Course, payments: &[Payment]) -> String {
    let now = Utc::now();
    let mut content = format!("<h1>{}</h1>", e(&course.title));
    if payments.is_empty() {
        content.push_str(&empty("لا توجد مدفوعات"));
    } else {
        content.push_str("<table class=\"payments\"><tr><th>المبلغ</th><th>التاريخ</th><th>صالح حتى</th></tr>");
        for payment in payments {
            content.push_str(&format!(
                "<tr class=\"{}\"><td>{}</td><td>{}</td><td>{}</td></tr>",
                if payment.is_current(now) { "current" } else { "expired" },
                payment.amount_paid,
                date(&payment.date_of_payment),
                date(&payment.valid_until)
            ));
        }
        content.push_str("</table>");
    }
    page(user, &course.title, &content)
}

pub fn my_courses(user: Option<&Principal>, courses: &[Course]) -> String {
    let content = format!(
        "<h1>دوراتي</h1>{}",
        course_cards(courses, |c| format!("/courses/{}", c.id))
    );
    page(user, "دوراتي", &content)
}

pub fn profile(principal: &Principal, user: &User) -> String {
    let content = format!(
        "<h1>{}</h1><img src=\"{}\" alt=\"\">{}\
         <form hx-post=\"/myprofile/img\" hx-encoding=\"multipart/form-data\">\
         <input type=\"file\" name=\"img\" accept=\"image/jpeg,image/png,image/webp\" required>\
         <button>تغيير الصورة</button></form><a href=\"/reset\">تغيير كلمة المرور</a>",
        e(&user.full_name()),
        e(&user.img_url),
        details(&[
            ("رقم الهاتف", user.phone_number.clone()),
            ("رقم ولي الأمر", user.parent_phone_number.clone()),
        ])
    );
    page(Some(principal), "حسابي", &content)
}

pub fn contact(user: Option<&Principal>) -> String {
    let content = "<h1>تواصل معنا</h1><form hx-post=\"/contact\">\
        <input name=\"full_name\" placeholder=\"الاسم\" required>\
        <input name=\"phone_number\" placeholder=\"رقم الهاتف\" required>\
        <textarea name=\"message\" required></textarea><button>إرسال</button></form>";
    page(user, "تواصل معنا", content)
}

pub fn reset(user: &Principal) -> String {
    let content = "<h1>تغيير كلمة المرور</h1><form hx-post=\"/reset\">\
        <input type=\"password\" name=\"current_password\" required>\
        <input type=\"password\" name=\"new_password\" minlength=\"8\" required>\
        <input type=\"password\" name=\"confirm_new_password\" minlength=\"8\" required>\
        <button>حفظ</button></form>";
    page(Some(user), "تغيير كلمة المرور", content)
}

pub fn signup() -> String {
    let content = "<h1>حساب جديد</h1><form id=\"signup\" hx-post=\"/signup\" hx-ext=\"json-enc\">\
        <input name=\"firstname\" required><input name=\"lastname\" required>\
        <input name=\"phone_number\" pattern=\"07[0-9]{9}\" required>\
        <input name=\"parent_phone_number\" pattern=\"07[0-9]{9}\" required>\
        <input type=\"password\" name=\"password\" minlength=\"8\" required>\
        <button>إنشاء الحساب</button></form>";
    page(None, "حساب جديد", content)
}

pub fn login() -> String {
    let content = "<h1>تسجيل الدخول</h1><form hx-post=\"/login\">\
        <input name=\"phone_number\" pattern=\"07[0-9]{9}\" required>\
        <input type=\"password\" name=\"password\" required>\
        <button>دخول</button></form>";
    page(None, "تسجيل الدخول", content)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overview() -> CourseOverview {
        CourseOverview {
            course: Course {
                id: "c1".to_string(),
                title: "Physics <1>".to_string(),
                ..Course::default()
            },
            lectures: (1..=4)
                .map(|order| Lecture {
                    id: format!("l{}", order),
                    title: format!("Lecture {}", order),
                    order,
                    ..Lecture::default()
                })
                .collect(),
            exams: Vec::new(),
        }
    }

    #[test]
    fn test_course_page_locks_lectures_after_preview() {
        let html = course(None, &overview(), false);
        assert!(html.contains("Physics &lt;1&gt;"));
        assert_eq!(html.matches("class=\"locked\"").count(), 1);
        assert!(html.contains("/courses/c1/lec/l4"));

        let html = course(None, &overview(), true);
        assert_eq!(html.matches("class=\"locked\"").count(), 0);
    }

    #[test]
    fn test_nav_shows_user_name() {
        let principal = Principal {
            user_id: "u1".to_string(),
            name: "Sara Hadi".to_string(),
            role: rehla_core::Role::Student,
            course_ids: Vec::new(),
        };
        assert!(home(Some(&principal), &[]).contains("Sara Hadi"));
        assert!(home(None, &[]).contains("/login"));
    }
}
