use tick_schedule::generator::Generator;
use tick_schedule::models::{Board, ChannelQueues, Register, ResourceType, Task, TaskSet};
use tick_schedule::parser::parse_schedule;
use tick_schedule::simulator::{verify, Rejection, RejectionKind, ScheduleKpi};

fn two_tasks(second_start: u32, second_channel: ResourceType) -> (ChannelQueues, TaskSet) {
    let tasks = TaskSet::new(vec![
        Task::new("1", ResourceType::Red, 2)
            .with_register(Register::A)
            .with_start(0),
        Task::new("2", second_channel, 1)
            .with_register(Register::B)
            .with_dependency(0)
            .with_start(second_start),
    ]);
    (ChannelQueues::from_scheduled(&tasks), tasks)
}

#[test]
fn dependent_starting_at_completion_is_accepted() {
    let (queues, tasks) = two_tasks(2, ResourceType::Red);
    assert!(verify(&queues, &tasks).is_ok());
}

#[test]
fn dependent_starting_early_is_rejected() {
    let (queues, tasks) = two_tasks(1, ResourceType::Green);
    let err = verify(&queues, &tasks).unwrap_err();
    assert_eq!(err.kind(), RejectionKind::DependencyUnmet);
    assert_eq!(err.tick(), Some(1));
    assert!(err.to_string().contains("1 has not completed at 1"));
}

#[test]
fn shared_register_across_channels_is_rejected() {
    let tasks = TaskSet::new(vec![
        Task::new("1", ResourceType::Red, 3)
            .with_register(Register::A)
            .with_start(0),
        Task::new("2", ResourceType::Green, 1)
            .with_register(Register::A)
            .with_start(1),
    ]);
    let queues = ChannelQueues::from_scheduled(&tasks);
    match verify(&queues, &tasks).unwrap_err() {
        Rejection::RegisterConflict {
            registers, tick, ..
        } => {
            assert_eq!(registers, vec![Register::A]);
            assert_eq!(tick, 1);
        }
        other => panic!("unexpected rejection: {other}"),
    }
}

#[test]
fn queue_order_against_ticks_is_rejected() {
    let tasks = TaskSet::new(vec![
        Task::new("1", ResourceType::Red, 1)
            .with_register(Register::A)
            .with_start(5),
        Task::new("2", ResourceType::Red, 1)
            .with_register(Register::B)
            .with_start(0),
    ]);
    let queues = ChannelQueues::new()
        .with(ResourceType::Red, 0)
        .with(ResourceType::Red, 1);
    let err = verify(&queues, &tasks).unwrap_err();
    assert_eq!(err.kind(), RejectionKind::OutOfOrder);
    assert!(err.to_string().starts_with("Schedule not in order!"));
}

#[test]
fn fresh_puzzle_is_rejected_as_unscheduled() {
    let tasks = Generator::new().generate(6);
    match verify(&ChannelQueues::new(), &tasks).unwrap_err() {
        Rejection::UnscheduledTasks { ids } => {
            let mut ids: Vec<u32> = ids.iter().map(|s| s.parse().unwrap()).collect();
            ids.sort_unstable();
            assert_eq!(ids, (1..=6).collect::<Vec<_>>());
        }
        other => panic!("unexpected rejection: {other}"),
    }
}

#[test]
fn parsed_text_schedule_round_trip() {
    let mut tasks = TaskSet::new(vec![
        Task::new("1", ResourceType::Red, 2).with_register(Register::A),
        Task::new("2", ResourceType::Green, 1)
            .with_register(Register::A)
            .with_dependency(0),
        Task::new("3", ResourceType::Blue, 2).with_register(Register::B),
    ]);

    let queues = parse_schedule(&["0:1", "2:2", "0:3"], &mut tasks).unwrap();
    let report = verify(&queues, &tasks).unwrap();
    assert_eq!(report.makespan, 3);

    let queues = parse_schedule(&["0:1", "1:2", "0:3"], &mut tasks).unwrap();
    let err = verify(&queues, &tasks).unwrap_err();
    assert_eq!(err.kind(), RejectionKind::RegisterConflict);
    assert!(err.is_user_error());
}

#[test]
fn board_placement_feeds_verifier() {
    let mut tasks = TaskSet::new(vec![
        Task::new("1", ResourceType::Red, 2).with_register(Register::A),
        Task::new("2", ResourceType::Red, 1)
            .with_register(Register::B)
            .with_dependency(0),
    ]);
    let mut board = Board::new();
    board.place(&mut tasks, 1, ResourceType::Red, 2).unwrap();
    board.place(&mut tasks, 0, ResourceType::Red, 0).unwrap();

    assert_eq!(board.lane(ResourceType::Red), &[0, 1]);
    assert!(verify(&board.queues(), &tasks).is_ok());

    board.lift(&mut tasks, ResourceType::Red, 1);
    let err = verify(&board.queues(), &tasks).unwrap_err();
    assert_eq!(err.kind(), RejectionKind::UnscheduledTasks);
}

#[test]
fn far_future_tick_is_reported_not_overflowed() {
    let task = Task::new("1", ResourceType::Red, 3).with_register(Register::A);
    let mut tasks = TaskSet::new(vec![task]);
    let queues = parse_schedule(&["4294967295:1"], &mut tasks).unwrap();

    let err = verify(&queues, &tasks).unwrap_err();
    assert_eq!(err.kind(), RejectionKind::NonTermination);

    let kpi = ScheduleKpi::calculate(&queues, &tasks);
    assert_eq!(kpi.makespan, u32::MAX);
    assert_eq!(kpi.busy_ticks, [3, 0, 0]);
}
