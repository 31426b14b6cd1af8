//! Repository trait definitions.
//!
//! One trait per aggregate. Every method talks to the authoritative store;
//! caching happens a layer above, in the service crate.

use async_trait::async_trait;
use rehla_core::{
    Answer, ContactMessage, Course, DashboardUser, Exam, FieldUpdates, Interface, Lecture,
    Material, Payment, RehlaResult, Subscription, User,
};

/// Course repository.
#[async_trait]
pub trait CourseRepository: Interface + Send + Sync {
    /// Finds a course by id.
    async fn find_by_id(&self, course_id: &str) -> RehlaResult<Option<Course>>;

    /// Lists every course.
    async fn find_all(&self) -> RehlaResult<Vec<Course>>;

    /// Adds a course and returns its id.
    async fn create(&self, course: &Course) -> RehlaResult<String>;

    /// Applies field writes to a course.
    async fn update(&self, course_id: &str, updates: &FieldUpdates) -> RehlaResult<()>;

    /// Deletes a course with its lectures, exams and materials.
    async fn delete(&self, course_id: &str) -> RehlaResult<bool>;
}

/// Lecture repository.
#[async_trait]
pub trait LectureRepository: Interface + Send + Sync {
    /// Finds a lecture of a course.
    async fn find_by_id(&self, course_id: &str, lecture_id: &str) -> RehlaResult<Option<Lecture>>;

    /// Lists the lectures of a course ordered by position.
    async fn find_all(&self, course_id: &str) -> RehlaResult<Vec<Lecture>>;

    /// Adds a lecture and returns its id.
    async fn create(&self, course_id: &str, lecture: &Lecture) -> RehlaResult<String>;

    /// Applies field writes to a lecture.
    async fn update(&self, course_id: &str, lecture_id: &str, updates: &FieldUpdates) -> RehlaResult<()>;

    /// Deletes a lecture.
    async fn delete(&self, course_id: &str, lecture_id: &str) -> RehlaResult<bool>;
}

/// Exam repository.
#[async_trait]
pub trait ExamRepository: Interface + Send + Sync {
    /// Finds an exam of a course.
    async fn find_by_id(&self, course_id: &str, exam_id: &str) -> RehlaResult<Option<Exam>>;

    /// Lists the exams of a course ordered by position.
    async fn find_all(&self, course_id: &str) -> RehlaResult<Vec<Exam>>;

    /// Adds an exam and returns its id.
    async fn create(&self, course_id: &str, exam: &Exam) -> RehlaResult<String>;

    /// Applies field writes to an exam.
    async fn update(&self, course_id: &str, exam_id: &str, updates: &FieldUpdates) -> RehlaResult<()>;

    /// Deletes an exam.
    async fn delete(&self, course_id: &str, exam_id: &str) -> RehlaResult<bool>;
}

/// Material repository.
#[async_trait]
pub trait MaterialRepository: Interface + Send + Sync {
    /// Finds a material of a course.
    async fn find_by_id(&self, course_id: &str, material_id: &str) -> RehlaResult<Option<Material>>;

    /// Lists the materials of a course ordered by position.
    async fn find_all(&self, course_id: &str) -> RehlaResult<Vec<Material>>;

    /// Adds a material and returns its id.
    async fn create(&self, course_id: &str, material: &Material) -> RehlaResult<String>;

    /// Applies field writes to a material.
    async fn update(&self, course_id: &str, material_id: &str, updates: &FieldUpdates) -> RehlaResult<()>;

    /// Deletes a material.
    async fn delete(&self, course_id: &str, material_id: &str) -> RehlaResult<bool>;
}

/// Subscriber repository.
#[async_trait]
pub trait UserRepository: Interface + Send + Sync {
    /// Finds a user by id.
    async fn find_by_id(&self, user_id: &str) -> RehlaResult<Option<User>>;

    /// Finds a user by phone number.
    async fn find_by_phone(&self, phone_number: &str) -> RehlaResult<Option<User>>;

    /// Finds the user owning a session token.
    ///
    /// Fails when more than one user carries the token.
    async fn find_by_session(&self, session_id: &str) -> RehlaResult<Option<User>>;

    /// Lists every user.
    async fn find_all(&self) -> RehlaResult<Vec<User>>;

    /// Adds a user and returns its id.
    async fn create(&self, user: &User) -> RehlaResult<String>;

    /// Applies field writes to a user.
    async fn update(&self, user_id: &str, updates: &FieldUpdates) -> RehlaResult<()>;

    /// Deletes a user.
    async fn delete(&self, user_id: &str) -> RehlaResult<bool>;
}

/// Subscription repository.
#[async_trait]
pub trait SubscriptionRepository: Interface + Send + Sync {
    /// Finds a user's subscription to a course.
    async fn find(&self, user_id: &str, course_id: &str) -> RehlaResult<Option<Subscription>>;

    /// Lists a user's subscriptions.
    async fn find_all(&self, user_id: &str) -> RehlaResult<Vec<Subscription>>;

    /// Writes a subscription; its id is the course id.
    async fn save(&self, user_id: &str, subscription: &Subscription) -> RehlaResult<()>;

    /// Applies field writes to a subscription.
    async fn update(&self, user_id: &str, course_id: &str, updates: &FieldUpdates) -> RehlaResult<()>;

    /// Deletes a subscription.
    async fn delete(&self, user_id: &str, course_id: &str) -> RehlaResult<bool>;
}

/// Payment repository.
#[async_trait]
pub trait PaymentRepository: Interface + Send + Sync {
    /// Lists the payments of a subscription, newest first.
    async fn find_all(&self, user_id: &str, course_id: &str) -> RehlaResult<Vec<Payment>>;

    /// Adds a payment and returns its id.
    async fn create(&self, user_id: &str, course_id: &str, payment: &Payment) -> RehlaResult<String>;

    /// Deletes a payment.
    async fn delete(&self, user_id: &str, course_id: &str, payment_id: &str) -> RehlaResult<bool>;
}

/// Answer repository.
#[async_trait]
pub trait AnswerRepository: Interface + Send + Sync {
    /// Finds a user's answer to an exam.
    async fn find(&self, user_id: &str, course_id: &str, exam_id: &str) -> RehlaResult<Option<Answer>>;

    /// Lists a user's answers within a course.
    async fn find_all(&self, user_id: &str, course_id: &str) -> RehlaResult<Vec<Answer>>;

    /// Lists every submitted answer to an exam as `(user, answer)` pairs.
    async fn find_by_exam(&self, course_id: &str, exam_id: &str) -> RehlaResult<Vec<(User, Answer)>>;

    /// Writes an answer; its id is the exam id.
    async fn save(&self, user_id: &str, answer: &Answer) -> RehlaResult<()>;

    /// Applies field writes to an answer.
    async fn update(&self, user_id: &str, course_id: &str, exam_id: &str, updates: &FieldUpdates) -> RehlaResult<()>;
}

/// Dashboard staff repository.
#[async_trait]
pub trait DashboardUserRepository: Interface + Send + Sync {
    /// Finds a staff account by id.
    async fn find_by_id(&self, staff_id: &str) -> RehlaResult<Option<DashboardUser>>;

    /// Finds a staff account by username.
    async fn find_by_username(&self, username: &str) -> RehlaResult<Option<DashboardUser>>;

    /// Finds the staff account owning a session token.
    async fn find_by_session(&self, session_id: &str) -> RehlaResult<Option<DashboardUser>>;

    /// Lists every staff account.
    async fn find_all(&self) -> RehlaResult<Vec<DashboardUser>>;

    /// Adds a staff account and returns its id.
    async fn create(&self, staff: &DashboardUser) -> RehlaResult<String>;

    /// Applies field writes to a staff account.
    async fn update(&self, staff_id: &str, updates: &FieldUpdates) -> RehlaResult<()>;

    /// Deletes a staff account.
    async fn delete(&self, staff_id: &str) -> RehlaResult<bool>;
}

/// Contact message repository.
#[async_trait]
pub trait ContactRepository: Interface + Send + Sync {
    /// Stores a message and returns its id.
    async fn create(&self, message: &ContactMessage) -> RehlaResult<String>;

    /// Lists every message, newest first.
    async fn find_all(&self) -> RehlaResult<Vec<ContactMessage>>;
}
