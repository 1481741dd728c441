//! Committed event builders shared by the projection tests.

use chrono::NaiveDate;
use classroom_core::event::Event;
use classroom_core::id::AggregateId;
use classroom_domain::domain::events::{
    ClassroomEvent, NewClassScheduled, NewStudentRegistered, StudentEnrolled, StudentEvent,
    StudentUnenrolled, TrainingClassEvent,
};
use classroom_test_support::fixed_now;
use uuid::Uuid;

fn committed(aggregate_id: &str, kind: ClassroomEvent, version: u64) -> Event<ClassroomEvent> {
    Event::new(AggregateId::from(aggregate_id), kind, Uuid::new_v4(), fixed_now()).with_version(version)
}

pub(crate) fn class_scheduled(class_id: &str, title: &str, date: NaiveDate, size: u32) -> Event<ClassroomEvent> {
    let kind = TrainingClassEvent::NewClassScheduled(NewClassScheduled {
        class_id: AggregateId::from(class_id),
        title: title.to_owned(),
        date,
        class_size: size,
    });
    committed(class_id, kind.into(), 0)
}

pub(crate) fn student_enrolled(class_id: &str, student_id: &str, version: u64) -> Event<ClassroomEvent> {
    let kind = TrainingClassEvent::StudentEnrolled(StudentEnrolled {
        class_id: AggregateId::from(class_id),
        student_id: AggregateId::from(student_id),
    });
    committed(class_id, kind.into(), version)
}

pub(crate) fn student_unenrolled(class_id: &str, student_id: &str, version: u64) -> Event<ClassroomEvent> {
    let kind = TrainingClassEvent::StudentUnenrolled(StudentUnenrolled {
        class_id: AggregateId::from(class_id),
        student_id: AggregateId::from(student_id),
        reason: "no longer interested".to_owned(),
    });
    committed(class_id, kind.into(), version)
}

pub(crate) fn student_registered(student_id: &str, email: &str, full_name: &str) -> Event<ClassroomEvent> {
    let kind = StudentEvent::NewStudentRegistered(NewStudentRegistered {
        student_id: AggregateId::from(student_id),
        email: email.to_owned(),
        full_name: full_name.to_owned(),
    });
    committed(student_id, kind.into(), 0)
}

pub(crate) fn date(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, month, day).unwrap()
}
