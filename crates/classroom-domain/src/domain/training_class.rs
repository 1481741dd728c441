//! The `TrainingClass` aggregate.

use std::collections::HashSet;

use chrono::NaiveDate;
use classroom_core::aggregate::AggregateRoot;
use classroom_core::clock::Clock;
use classroom_core::event::Event;
use classroom_core::id::{AggregateId, AggregateType};
use uuid::Uuid;

use super::errors::TrainingClassInvariantViolation;
use super::events::{NewClassScheduled, StudentEnrolled, StudentUnenrolled, TrainingClassEvent};

/// A scheduled class with a fixed number of seats.
///
/// Only the state needed to check enrollment invariants is kept: the number
/// of free seats and the set of enrolled students.
#[derive(Debug)]
pub struct TrainingClass {
    id: AggregateId,
    version: Option<u64>,
    available_seats: u32,
    enrolled_students: HashSet<AggregateId>,
    uncommitted_events: Vec<Event<TrainingClassEvent>>,
}

impl TrainingClass {
    /// Schedules a new class, producing a `NewClassScheduled` event.
    ///
    /// # Errors
    ///
    /// Returns `InvalidClassSize` if `size` is zero or negative.
    pub fn schedule_new(
        title: String,
        date: NaiveDate,
        size: i32,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<Self, TrainingClassInvariantViolation> {
        let class_size = u32::try_from(size)
            .ok()
            .filter(|size| *size > 0)
            .ok_or(TrainingClassInvariantViolation::InvalidClassSize { size })?;

        let mut class = <Self as AggregateRoot>::new(AggregateId::generate());
        let kind = TrainingClassEvent::NewClassScheduled(NewClassScheduled {
            class_id: class.id.clone(),
            title,
            date,
            class_size,
        });
        class.apply_change(Event::new(class.id.clone(), kind, correlation_id, clock.now()));
        Ok(class)
    }

    /// Enrolls a student, producing a `StudentEnrolled` event.
    ///
    /// # Errors
    ///
    /// Returns `StudentAlreadyEnrolled` if the student holds a seat, or
    /// `ClassHasNoAvailableSpots` if every seat is taken.
    pub fn enroll_student(
        &mut self,
        student_id: AggregateId,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), TrainingClassInvariantViolation> {
        if self.enrolled_students.contains(&student_id) {
            return Err(TrainingClassInvariantViolation::StudentAlreadyEnrolled {
                class_id: self.id.clone(),
                student_id,
            });
        }
        if self.available_seats == 0 {
            return Err(TrainingClassInvariantViolation::ClassHasNoAvailableSpots {
                class_id: self.id.clone(),
            });
        }

        let kind = TrainingClassEvent::StudentEnrolled(StudentEnrolled {
            class_id: self.id.clone(),
            student_id,
        });
        self.apply_change(Event::new(self.id.clone(), kind, correlation_id, clock.now()));
        Ok(())
    }

    /// Unenrolls a student, producing a `StudentUnenrolled` event.
    ///
    /// # Errors
    ///
    /// Returns `UnenrollingNotEnrolledStudent` if the student holds no seat.
    pub fn unenroll_student(
        &mut self,
        student_id: AggregateId,
        reason: String,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), TrainingClassInvariantViolation> {
        if !self.enrolled_students.contains(&student_id) {
            return Err(TrainingClassInvariantViolation::UnenrollingNotEnrolledStudent {
                class_id: self.id.clone(),
                student_id,
            });
        }

        let kind = TrainingClassEvent::StudentUnenrolled(StudentUnenrolled {
            class_id: self.id.clone(),
            student_id,
            reason,
        });
        self.apply_change(Event::new(self.id.clone(), kind, correlation_id, clock.now()));
        Ok(())
    }

    /// Returns the number of free seats.
    #[must_use]
    pub fn available_seats(&self) -> u32 {
        self.available_seats
    }

    /// Returns `true` if the student holds a seat.
    #[must_use]
    pub fn is_enrolled(&self, student_id: &AggregateId) -> bool {
        self.enrolled_students.contains(student_id)
    }
}

impl AggregateRoot for TrainingClass {
    type Kind = TrainingClassEvent;

    const AGGREGATE_TYPE: AggregateType = AggregateType::new("class");

    fn new(id: AggregateId) -> Self {
        Self {
            id,
            version: None,
            available_seats: 0,
            enrolled_students: HashSet::new(),
            uncommitted_events: Vec::new(),
        }
    }

    fn aggregate_id(&self) -> &AggregateId {
        &self.id
    }

    fn version(&self) -> Option<u64> {
        self.version
    }

    fn apply(&mut self, event: &Event<Self::Kind>) {
        match &event.kind {
            TrainingClassEvent::NewClassScheduled(payload) => {
                self.available_seats = payload.class_size;
            }
            TrainingClassEvent::StudentEnrolled(payload) => {
                self.available_seats = self.available_seats.saturating_sub(1);
                self.enrolled_students.insert(payload.student_id.clone());
            }
            TrainingClassEvent::StudentUnenrolled(payload) => {
                self.available_seats += 1;
                self.enrolled_students.remove(&payload.student_id);
            }
        }
        if let Some(version) = event.version() {
            self.version = Some(version);
        }
    }

    fn uncommitted_events(&self) -> &[Event<Self::Kind>] {
        &self.uncommitted_events
    }

    fn record(&mut self, event: Event<Self::Kind>) {
        self.uncommitted_events.push(event);
    }

    fn mark_changes_as_committed(&mut self) {
        self.uncommitted_events.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use classroom_core::aggregate::load_from_history;
    use classroom_core::event::EventKind;
    use classroom_test_support::{FixedClock, fixed_now};

    use crate::domain::events::{
        ClassroomEvent, NEW_CLASS_SCHEDULED_EVENT_TYPE, STUDENT_ENROLLED_EVENT_TYPE,
        STUDENT_UNENROLLED_EVENT_TYPE,
    };

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
    }

    fn scheduled(size: i32) -> TrainingClass {
        TrainingClass::schedule_new(
            "Event Sourcing 101".to_owned(),
            date(),
            size,
            Uuid::new_v4(),
            &FixedClock::default(),
        )
        .unwrap()
    }

    /// Marks pending events committed the way the store numbers them.
    fn commit(class: &mut TrainingClass) -> Vec<Event<ClassroomEvent>> {
        let first = class.version().map_or(0, |v| v + 1);
        let committed: Vec<_> = class
            .uncommitted_events()
            .iter()
            .cloned()
            .zip(first..)
            .map(|(event, version)| event.with_version(version))
            .collect();
        class.version = committed.last().and_then(Event::version).or(class.version);
        class.mark_changes_as_committed();
        committed.into_iter().map(Event::convert).collect()
    }

    #[test]
    fn test_schedule_new_produces_new_class_scheduled_event() {
        // Arrange
        let correlation_id = Uuid::new_v4();
        let clock = FixedClock::default();

        // Act
        let class = TrainingClass::schedule_new(
            "Event Sourcing 101".to_owned(),
            date(),
            10,
            correlation_id,
            &clock,
        )
        .unwrap();

        // Assert
        assert_eq!(class.available_seats(), 10);
        assert_eq!(class.version(), None);
        let events = class.uncommitted_events();
        assert_eq!(events.len(), 1);

        let event = &events[0];
        assert_eq!(event.kind.event_type(), NEW_CLASS_SCHEDULED_EVENT_TYPE);
        assert_eq!(event.metadata.aggregate_id, *class.aggregate_id());
        assert_eq!(event.metadata.correlation_id, correlation_id);
        assert_eq!(event.metadata.occurred_at, fixed_now());
        assert!(!event.is_committed());
        match &event.kind {
            TrainingClassEvent::NewClassScheduled(payload) => {
                assert_eq!(payload.class_id, *class.aggregate_id());
                assert_eq!(payload.title, "Event Sourcing 101");
                assert_eq!(payload.date, date());
                assert_eq!(payload.class_size, 10);
            }
            other => panic!("expected NewClassScheduled, got {other:?}"),
        }
    }

    #[test]
    fn test_schedule_new_rejects_zero_and_negative_sizes() {
        // Arrange
        let clock = FixedClock::default();

        for size in [0, -1] {
            // Act
            let result =
                TrainingClass::schedule_new("Empty".to_owned(), date(), size, Uuid::new_v4(), &clock);

            // Assert
            assert_eq!(
                result.unwrap_err(),
                TrainingClassInvariantViolation::InvalidClassSize { size }
            );
        }
    }

    #[test]
    fn test_enroll_student_takes_a_seat() {
        // Arrange
        let mut class = scheduled(2);
        commit(&mut class);
        let student = AggregateId::from("student-a");

        // Act
        class
            .enroll_student(student.clone(), Uuid::new_v4(), &FixedClock::default())
            .unwrap();

        // Assert
        assert_eq!(class.available_seats(), 1);
        assert!(class.is_enrolled(&student));
        let events = class.uncommitted_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind.event_type(), STUDENT_ENROLLED_EVENT_TYPE);
    }

    #[test]
    fn test_enroll_student_twice_is_rejected_without_emitting() {
        // Arrange
        let mut class = scheduled(5);
        let student = AggregateId::from("student-a");
        class
            .enroll_student(student.clone(), Uuid::new_v4(), &FixedClock::default())
            .unwrap();
        commit(&mut class);

        // Act
        let result = class.enroll_student(student.clone(), Uuid::new_v4(), &FixedClock::default());

        // Assert
        assert_eq!(
            result.unwrap_err(),
            TrainingClassInvariantViolation::StudentAlreadyEnrolled {
                class_id: class.aggregate_id().clone(),
                student_id: student,
            }
        );
        assert!(class.uncommitted_events().is_empty());
        assert_eq!(class.available_seats(), 4);
    }

    #[test]
    fn test_enroll_student_in_full_class_is_rejected_without_emitting() {
        // Arrange
        let mut class = scheduled(2);
        let clock = FixedClock::default();
        class.enroll_student(AggregateId::from("a"), Uuid::new_v4(), &clock).unwrap();
        class.enroll_student(AggregateId::from("b"), Uuid::new_v4(), &clock).unwrap();
        commit(&mut class);

        // Act
        let result = class.enroll_student(AggregateId::from("c"), Uuid::new_v4(), &clock);

        // Assert
        assert_eq!(
            result.unwrap_err(),
            TrainingClassInvariantViolation::ClassHasNoAvailableSpots {
                class_id: class.aggregate_id().clone(),
            }
        );
        assert!(class.uncommitted_events().is_empty());
        assert_eq!(class.version(), Some(2));
    }

    #[test]
    fn test_unenroll_student_gives_the_seat_back() {
        // Arrange
        let mut class = scheduled(1);
        let clock = FixedClock::default();
        let student = AggregateId::from("student-a");
        class.enroll_student(student.clone(), Uuid::new_v4(), &clock).unwrap();
        commit(&mut class);

        // Act
        class
            .unenroll_student(student.clone(), "moved abroad".to_owned(), Uuid::new_v4(), &clock)
            .unwrap();

        // Assert
        assert_eq!(class.available_seats(), 1);
        assert!(!class.is_enrolled(&student));
        match &class.uncommitted_events()[0].kind {
            TrainingClassEvent::StudentUnenrolled(payload) => {
                assert_eq!(payload.reason, "moved abroad");
                assert_eq!(payload.student_id, student);
            }
            other => panic!("expected StudentUnenrolled, got {other:?}"),
        }
        assert_eq!(
            class.uncommitted_events()[0].kind.event_type(),
            STUDENT_UNENROLLED_EVENT_TYPE
        );
    }

    #[test]
    fn test_unenroll_never_enrolled_student_is_rejected_without_emitting() {
        // Arrange
        let mut class = scheduled(3);
        commit(&mut class);

        // Act
        let result = class.unenroll_student(
            AggregateId::from("stranger"),
            "no reason".to_owned(),
            Uuid::new_v4(),
            &FixedClock::default(),
        );

        // Assert
        assert!(matches!(
            result,
            Err(TrainingClassInvariantViolation::UnenrollingNotEnrolledStudent { .. })
        ));
        assert!(class.uncommitted_events().is_empty());
        assert_eq!(class.available_seats(), 3);
    }

    #[test]
    fn test_replaying_committed_history_reproduces_invariant_state() {
        // Arrange
        let clock = FixedClock::default();
        let mut class = scheduled(3);
        let mut history = commit(&mut class);
        class.enroll_student(AggregateId::from("a"), Uuid::new_v4(), &clock).unwrap();
        class.enroll_student(AggregateId::from("b"), Uuid::new_v4(), &clock).unwrap();
        history.extend(commit(&mut class));
        class
            .unenroll_student(AggregateId::from("a"), "sick".to_owned(), Uuid::new_v4(), &clock)
            .unwrap();
        history.extend(commit(&mut class));

        // Act
        let shell = <TrainingClass as AggregateRoot>::new(class.aggregate_id().clone());
        let replayed = load_from_history(shell, history).unwrap();

        // Assert
        assert_eq!(replayed.available_seats(), class.available_seats());
        assert_eq!(replayed.enrolled_students, class.enrolled_students);
        assert_eq!(replayed.version(), Some(3));
        assert!(replayed.uncommitted_events().is_empty());
    }
}
