use actix_web::web::{scope, ServiceConfig};
use actix_web::Scope;

use courses::{get_course_details, get_course_lessons, get_courses};
use enrollments::{admin_enroll, auto_enroll_free, cancel_enrollment, enroll, my_enrollments};
use lessons::view_lesson;
use users::{get_profile, login, register, set_role};

mod courses;
mod enrollments;
mod health_check;
mod lessons;
mod users;

use crate::routes::health_check::*;

fn util_routes() -> Scope {
    scope("").service(health_check)
}

fn users_routes() -> Scope {
    scope("users")
        .service(register)
        .service(login)
        .service(get_profile)
        .service(set_role)
}

fn courses_routes() -> Scope {
    scope("courses")
        .service(get_courses)
        .service(get_course_details)
        .service(get_course_lessons)
}

fn lessons_routes() -> Scope {
    scope("lessons").service(view_lesson)
}

fn enrollments_routes() -> Scope {
    scope("enrollments")
        .service(auto_enroll_free)
        .service(admin_enroll)
        .service(my_enrollments)
        .service(cancel_enrollment)
        .service(enroll)
}

pub fn coursebase_routes(conf: &mut ServiceConfig) {
    conf.service(
        scope("api/v1")
            .service(users_routes())
            .service(courses_routes())
            .service(lessons_routes())
            .service(enrollments_routes())
            .service(util_routes()),
    );
}
