use chrono::{Local, NaiveDate};
use project_ledger::models::*;
use speculate2::speculate;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

/// Input with the given dates and every cost, rate and revenue at zero.
fn input(start: NaiveDate, estimated_end: NaiveDate) -> CreateProjectInput {
    CreateProjectInput {
        responsible_user_id: "u-17".to_string(),
        project_code: "ENG-001".to_string(),
        start_date: start,
        estimated_end_date: estimated_end,
        lead_hours: 0.0,
        engineer_hours: 0.0,
        subcontracting_cost: 0.0,
        expenses: 0.0,
        revenue: 0.0,
        lead_hourly_rate: 0.0,
        engineer_hourly_rate: 0.0,
        status: None,
        actual_end_date: None,
    }
}

fn costed_input() -> CreateProjectInput {
    CreateProjectInput {
        lead_hours: 20.0,
        lead_hourly_rate: 50.0,
        engineer_hours: 20.0,
        engineer_hourly_rate: 30.0,
        subcontracting_cost: 100.0,
        expenses: 50.0,
        revenue: 2000.0,
        ..input(date(2024, 1, 1), date(2024, 3, 1))
    }
}

fn create(input: CreateProjectInput) -> Project {
    Project::new(input).expect("Failed to create project")
}

speculate! {
    before {
        let start = date(2024, 1, 1);
        let estimated_end = date(2024, 3, 1);
    }

    describe "construction" {
        it "starts in progress with no actual end date" {
            let mut zero_cost = input(start, estimated_end);
            zero_cost.revenue = 1000.0;
            let project = create(zero_cost);

            assert_eq!(project.status(), ProjectStatus::InProgress);
            assert_eq!(project.actual_end_date(), None);
            assert_eq!(project.calculate_total_cost(), 0.0);
            assert_eq!(project.calculate_profitability(), 0.0);
        }

        it "keeps every supplied field" {
            let project = create(costed_input());

            assert_eq!(project.responsible_user_id(), "u-17");
            assert_eq!(project.project_code(), "ENG-001");
            assert_eq!(project.start_date(), start);
            assert_eq!(project.estimated_end_date(), estimated_end);
            assert_eq!(project.lead_hours(), 20.0);
            assert_eq!(project.engineer_hours(), 20.0);
            assert_eq!(project.subcontracting_cost(), 100.0);
            assert_eq!(project.expenses(), 50.0);
            assert_eq!(project.revenue(), 2000.0);
            assert_eq!(project.lead_hourly_rate(), 50.0);
            assert_eq!(project.engineer_hourly_rate(), 30.0);
        }

        it "accepts a start date equal to the estimated end date" {
            let project = create(input(start, start));
            assert_eq!(project.estimated_end_date(), start);
        }

        it "rejects a start date after the estimated end date" {
            let err = Project::new(input(date(2024, 3, 1), date(2024, 1, 1))).unwrap_err();
            assert_eq!(err, ProjectError::InvalidDateRange {
                start: date(2024, 3, 1),
                end: date(2024, 1, 1),
                bound: DateBound::EstimatedEnd,
            });
            assert!(err.to_string().contains("estimated end"));
        }

        it "rejects an actual end date before the start date" {
            let mut bad = input(start, estimated_end);
            bad.actual_end_date = Some(date(2023, 12, 31));

            let err = Project::new(bad).unwrap_err();
            assert_eq!(err, ProjectError::InvalidDateRange {
                start,
                end: date(2023, 12, 31),
                bound: DateBound::ActualEnd,
            });
            assert!(err.to_string().contains("actual end"));
        }

        it "accepts an explicit valid status and actual end date" {
            let mut done = input(start, estimated_end);
            done.status = Some("completed".to_string());
            done.actual_end_date = Some(date(2024, 2, 1));

            let project = create(done);
            assert_eq!(project.status(), ProjectStatus::Completed);
            assert_eq!(project.actual_end_date(), Some(date(2024, 2, 1)));
            assert_eq!(project.evaluate_estimate_accuracy(), EstimateVerdict::Adequate);
        }

        it "accepts variant names as status labels" {
            let mut named = input(start, estimated_end);
            named.status = Some("InProgress".to_string());
            assert_eq!(create(named).status(), ProjectStatus::InProgress);

            let mut cancelled = input(start, estimated_end);
            cancelled.status = Some("Cancelled".to_string());
            assert_eq!(create(cancelled).status(), ProjectStatus::Cancelled);
        }

        it "rejects an unknown status naming the allowed set" {
            let mut bad = input(start, estimated_end);
            bad.status = Some("on_hold".to_string());

            match Project::new(bad).unwrap_err() {
                ProjectError::InvalidStatus { value, allowed } => {
                    assert_eq!(value, "on_hold");
                    assert_eq!(allowed, vec!["in_progress", "completed", "cancelled"]);
                }
                other => panic!("unexpected error: {other:?}"),
            }
        }

        it "reports the status error before the date error" {
            let mut bad = input(date(2024, 3, 1), date(2024, 1, 1));
            bad.status = Some("paused".to_string());

            assert!(matches!(
                Project::new(bad),
                Err(ProjectError::InvalidStatus { .. })
            ));
        }

        it "does not range-check numeric fields" {
            let mut negative = input(start, estimated_end);
            negative.lead_hours = -5.0;
            negative.lead_hourly_rate = 10.0;
            negative.expenses = -20.0;

            let project = create(negative);
            assert_eq!(project.calculate_total_cost(), -70.0);
        }
    }

    describe "calculate_total_cost" {
        it "sums both labor roles, subcontracting and expenses" {
            let project = create(costed_input());
            assert_eq!(project.calculate_total_cost(), 1750.0);
        }

        it "is additive across arbitrary field values" {
            let cases = [
                (1.5, 80.0, 3.25, 42.0, 12.0, 7.5),
                (0.0, 0.0, 40.0, 55.5, 0.0, 0.0),
                (100.0, 120.0, 0.0, 0.0, 999.99, 0.01),
            ];
            for (lh, lr, eh, er, sub, exp) in cases {
                let project = create(CreateProjectInput {
                    lead_hours: lh,
                    lead_hourly_rate: lr,
                    engineer_hours: eh,
                    engineer_hourly_rate: er,
                    subcontracting_cost: sub,
                    expenses: exp,
                    ..input(start, estimated_end)
                });
                assert_eq!(project.calculate_total_cost(), lh * lr + eh * er + sub + exp);
            }
        }
    }

    describe "calculate_profitability" {
        it "computes the markup percentage" {
            let project = create(costed_input());
            let expected = (2000.0 - 1750.0) / 1750.0 * 100.0;
            assert!((project.calculate_profitability() - expected).abs() < 1e-9);
        }

        it "is negative when revenue is below cost" {
            let project = create(CreateProjectInput { revenue: 875.0, ..costed_input() });
            assert_eq!(project.calculate_profitability(), -50.0);
        }

        it "returns zero for a zero total cost whatever the revenue" {
            for revenue in [0.0, 1000.0, -250.0] {
                let project = create(CreateProjectInput {
                    revenue,
                    ..input(start, estimated_end)
                });
                assert_eq!(project.calculate_profitability(), 0.0);
            }
        }
    }

    describe "record_actual_completion" {
        it "completes the project with the given date" {
            let mut project = create(input(start, estimated_end));
            project.record_actual_completion(date(2024, 2, 15)).expect("completion failed");

            assert_eq!(project.status(), ProjectStatus::Completed);
            assert_eq!(project.actual_end_date(), Some(date(2024, 2, 15)));
        }

        it "accepts the start date itself" {
            let mut project = create(input(start, estimated_end));
            project.record_actual_completion(start).expect("completion failed");
            assert_eq!(project.actual_end_date(), Some(start));
        }

        it "rejects a date before the start date without changing state" {
            let mut project = create(input(start, estimated_end));
            let before = project.clone();

            let err = project.record_actual_completion(date(2023, 12, 1)).unwrap_err();
            assert_eq!(err, ProjectError::InvalidCompletionDate {
                date: date(2023, 12, 1),
                start,
            });
            assert_eq!(project, before);
        }

        it "overwrites an earlier completion under the permissive policy" {
            let mut project = create(input(start, estimated_end));
            project.record_actual_completion(date(2024, 2, 1)).expect("completion failed");
            project.record_actual_completion(date(2024, 5, 1)).expect("completion failed");

            assert_eq!(project.status(), ProjectStatus::Completed);
            assert_eq!(project.actual_end_date(), Some(date(2024, 5, 1)));
        }

        it "reopens a cancelled project as completed under the permissive policy" {
            let mut project = create(input(start, estimated_end));
            project.cancel_on(date(2024, 1, 20));
            project
                .record_actual_completion_with(date(2024, 2, 1), CompletionPolicy::Permissive)
                .expect("completion failed");

            assert_eq!(project.status(), ProjectStatus::Completed);
            assert_eq!(project.actual_end_date(), Some(date(2024, 2, 1)));
        }

        it "rejects terminal projects under the locked policy" {
            let mut completed = create(input(start, estimated_end));
            completed.record_actual_completion(date(2024, 2, 1)).expect("completion failed");
            let snapshot = completed.clone();

            let err = completed
                .record_actual_completion_with(date(2024, 2, 20), CompletionPolicy::TerminalLocked)
                .unwrap_err();
            assert_eq!(err, ProjectError::TerminalState { status: ProjectStatus::Completed });
            assert_eq!(completed, snapshot);

            let mut cancelled = create(input(start, estimated_end));
            cancelled.cancel_on(date(2024, 1, 20));
            let err = cancelled
                .record_actual_completion_with(date(2024, 2, 20), CompletionPolicy::TerminalLocked)
                .unwrap_err();
            assert_eq!(err, ProjectError::TerminalState { status: ProjectStatus::Cancelled });
            assert_eq!(cancelled.status(), ProjectStatus::Cancelled);
            assert_eq!(cancelled.actual_end_date(), Some(date(2024, 1, 20)));
        }

        it "completes in-progress projects under the locked policy" {
            let mut project = create(input(start, estimated_end));
            project
                .record_actual_completion_with(date(2024, 2, 1), CompletionPolicy::TerminalLocked)
                .expect("completion failed");
            assert_eq!(project.status(), ProjectStatus::Completed);
        }
    }

    describe "cancel" {
        it "stamps today's date" {
            let mut project = create(input(start, estimated_end));
            let before = Local::now().date_naive();
            project.cancel();
            let after = Local::now().date_naive();

            assert_eq!(project.status(), ProjectStatus::Cancelled);
            let stamped = project.actual_end_date().expect("cancel sets the end date");
            assert!(stamped == before || stamped == after);
        }

        it "succeeds from any prior state" {
            let mut project = create(input(start, estimated_end));
            project.record_actual_completion(date(2024, 2, 1)).expect("completion failed");
            project.cancel_on(date(2024, 2, 10));
            assert_eq!(project.status(), ProjectStatus::Cancelled);
            assert_eq!(project.actual_end_date(), Some(date(2024, 2, 10)));

            project.cancel_on(date(2024, 2, 11));
            assert_eq!(project.actual_end_date(), Some(date(2024, 2, 11)));
        }
    }

    describe "evaluate_estimate_accuracy" {
        it "is in progress before completion" {
            let project = create(input(start, estimated_end));
            assert_eq!(project.evaluate_estimate_accuracy(), EstimateVerdict::InProgress);
        }

        it "is adequate when finished before the estimate" {
            let mut project = create(input(start, estimated_end));
            project.record_actual_completion(date(2024, 2, 15)).expect("completion failed");
            assert_eq!(project.evaluate_estimate_accuracy(), EstimateVerdict::Adequate);
            assert_eq!(project.evaluate_estimate_accuracy().as_str(), "Adequate");
        }

        it "is adequate when finished exactly on the estimate" {
            let mut project = create(input(start, estimated_end));
            project.record_actual_completion(estimated_end).expect("completion failed");
            assert_eq!(project.evaluate_estimate_accuracy(), EstimateVerdict::Adequate);
        }

        it "is inadequate when finished after the estimate" {
            let mut project = create(input(start, estimated_end));
            project.record_actual_completion(date(2024, 4, 1)).expect("completion failed");
            assert_eq!(project.evaluate_estimate_accuracy(), EstimateVerdict::Inadequate);
        }

        it "reports cancelled projects as in progress" {
            let mut project = create(input(start, estimated_end));
            project.cancel();
            assert!(project.actual_end_date().is_some());
            assert_eq!(project.evaluate_estimate_accuracy(), EstimateVerdict::InProgress);
            assert_eq!(project.evaluate_estimate_accuracy().as_str(), "InProgress");
        }
    }

    describe "summarize" {
        it "reports every figure with profitability rounded to two places" {
            let mut project = create(costed_input());
            project.record_actual_completion(date(2024, 2, 15)).expect("completion failed");

            let summary = project.summarize();
            assert_eq!(summary.project_code, "ENG-001");
            assert_eq!(summary.responsible_user_id, "u-17");
            assert_eq!(summary.status, ProjectStatus::Completed);
            assert_eq!(summary.dates.start, start);
            assert_eq!(summary.dates.estimated_end, estimated_end);
            assert_eq!(summary.dates.actual_end, Some(date(2024, 2, 15)));
            assert_eq!(summary.costs.total, 1750.0);
            assert_eq!(summary.costs.revenue, 2000.0);
            assert_eq!(summary.profitability_pct, 14.29);
            assert_eq!(summary.estimate, EstimateVerdict::Adequate);
        }

        it "serializes as a nested object" {
            let summary = create(costed_input()).summarize();
            let json = serde_json::to_value(&summary).expect("serialize");

            assert_eq!(json["status"], "in_progress");
            assert_eq!(json["dates"]["start"], "2024-01-01");
            assert!(json["dates"]["actual_end"].is_null());
            assert_eq!(json["costs"]["total"], 1750.0);
            assert_eq!(json["profitability_pct"], 14.29);
            assert_eq!(json["estimate"], "InProgress");
        }

        it "rounds exact halfway profitability to the even cent" {
            let cases = [(800.0, 801.0, 0.12), (800.0, 803.0, 0.38), (32.0, 3.0, -90.62)];
            for (expenses, revenue, expected) in cases {
                let summary = create(CreateProjectInput {
                    expenses,
                    revenue,
                    ..input(start, estimated_end)
                })
                .summarize();
                assert_eq!(summary.profitability_pct, expected);
            }
        }

        it "rounds near-halfway profitability by its stored value" {
            let cases = [(1000.0, 1026.75, 2.67), (1000.0, 1001.35, 0.14), (200.0, 0.03, -99.98)];
            for (expenses, revenue, expected) in cases {
                let summary = create(CreateProjectInput {
                    expenses,
                    revenue,
                    ..input(start, estimated_end)
                })
                .summarize();
                assert_eq!(summary.profitability_pct, expected);
            }
        }

        it "does not change the project" {
            let project = create(costed_input());
            let before = project.clone();
            let _ = project.summarize();
            assert_eq!(project, before);
        }
    }
}
