//! Dashboard aggregation. Every query is one pass over a full scan of the
//! shift table; nothing is cached or persisted between calls.

use crate::core::calculator::duration::{OVERTIME_THRESHOLD_HOURS, running_hours};
use crate::core::calculator::gaps::stage_gaps;
use crate::core::calculator::rounding::{failure_rate, round2};
use crate::core::shift::sort_by_driver_name;
use crate::errors::{AppError, AppResult};
use crate::models::dashboard::{
    ActiveDriver, Dashboard, DashboardDetail, DriverDrops, DriverOvertime, FailedDropsDay,
    HelperCompanyCount, OvertimeDay, PunchOutMiss, TodayStats, TrendPoint, VehicleHours,
    VehicleKm,
};
use crate::models::shift::ShiftRecord;
use crate::utils::date::format_date;
use crate::utils::time::format_civil;
use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy)]
pub struct DashboardSettings {
    pub overtime_threshold: f64,
    pub trend_window_days: i64,
    pub top_helper_companies: usize,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            overtime_threshold: OVERTIME_THRESHOLD_HOURS,
            trend_window_days: 30,
            top_helper_companies: 5,
        }
    }
}

/// Accumulator keyed by first appearance.
fn slot<'m, V: Default>(entries: &'m mut Vec<(String, V)>, key: &str) -> &'m mut V {
    let idx = match entries.iter().position(|(k, _)| k == key) {
        Some(i) => i,
        None => {
            entries.push((key.to_string(), V::default()));
            entries.len() - 1
        }
    };
    &mut entries[idx].1
}

/// Descending by value; equal values keep first-seen order.
fn sorted_totals(mut totals: Vec<(String, f64)>) -> Vec<(String, f64)> {
    totals.sort_by(|a, b| b.1.total_cmp(&a.1));
    totals
}

#[derive(Default)]
struct TrendAcc {
    count: usize,
    duration: f64,
    overtime: f64,
}

#[derive(Default)]
struct DropsAcc {
    name: String,
    total: u64,
    failed: u64,
}

#[derive(Default)]
struct OvertimeAcc {
    name: String,
    overtime: f64,
    hours: f64,
}

pub struct DashboardLogic;

impl DashboardLogic {
    pub fn build(records: &[ShiftRecord], now: NaiveDateTime, settings: &DashboardSettings) -> Dashboard {
        let today = now.date();
        let trend_start = now - TimeDelta::days(settings.trend_window_days);

        let mut active = Vec::new();
        let mut misses = Vec::new();
        let mut vehicle_hours: Vec<(String, f64)> = Vec::new();
        let mut trend: BTreeMap<NaiveDate, TrendAcc> = BTreeMap::new();
        let mut drops: BTreeMap<NaiveDate, Vec<(String, DropsAcc)>> = BTreeMap::new();
        let mut overtime: BTreeMap<NaiveDate, Vec<(String, OvertimeAcc)>> = BTreeMap::new();
        let mut helper_companies: Vec<(String, usize)> = Vec::new();

        let mut today_count = 0usize;
        let mut today_duration = 0.0;
        let mut today_failed = 0u64;

        for r in records {
            if r.driver_id.trim().is_empty() {
                continue;
            }

            if r.shift_date == today {
                if let Some(company) = r.helper_company_name() {
                    *slot(&mut helper_companies, company) += 1;
                }
            }

            if !r.is_complete() {
                let hours = running_hours(&r.arrival_at_gate, &now);
                active.push(ActiveDriver {
                    row_id: r.row_id.clone(),
                    driver_id: r.driver_id.clone(),
                    driver_name: r.driver_name.clone(),
                    vehicle_number: r.vehicle_number.clone(),
                    arrival_time: format_civil(&r.arrival_at_gate),
                    departure_time: r.recorded_departure().as_ref().map(format_civil),
                    current_stage: r.stage.number(),
                    running_hours: hours,
                    is_overtime: hours > settings.overtime_threshold,
                });

                if r.shift_date != today {
                    misses.push(PunchOutMiss {
                        row_id: r.row_id.clone(),
                        shift_date: format_date(&r.shift_date),
                        driver_id: r.driver_id.clone(),
                        driver_name: r.driver_name.clone(),
                        vehicle_number: r.vehicle_number.clone(),
                        stuck_stage: r.stage.pending_stage().unwrap_or(4),
                    });
                }
                continue;
            }

            if !r.counts_as_completed() {
                continue;
            }

            let duration = r.duration();
            let ot = r.overtime();

            if !r.vehicle_number.trim().is_empty() {
                *slot(&mut vehicle_hours, &r.vehicle_number) += duration;
            }

            if r.arrival_at_gate >= trend_start {
                let t = trend.entry(r.shift_date).or_default();
                t.count += 1;
                t.duration += duration;
                t.overtime += ot;
            }

            let d = slot(drops.entry(r.shift_date).or_default(), &r.driver_id);
            d.name.clone_from(&r.driver_name);
            d.total += u64::from(r.total_drops);
            d.failed += u64::from(r.failed());

            if ot > 0.0 {
                let o = slot(overtime.entry(r.shift_date).or_default(), &r.driver_id);
                o.name.clone_from(&r.driver_name);
                o.overtime += ot;
                o.hours += duration;
            }

            if r.shift_date == today {
                today_count += 1;
                today_duration += duration;
                today_failed += u64::from(r.failed());
            }
        }

        sort_by_driver_name(&mut active, |a| a.driver_name.as_str());

        let vehicle_run_time = sorted_totals(vehicle_hours)
            .into_iter()
            .map(|(vehicle_number, hours)| VehicleHours {
                vehicle_number,
                total_hours: round2(hours),
            })
            .collect();

        let shift_trend_by_date = trend
            .into_iter()
            .map(|(date, t)| TrendPoint {
                date: format_date(&date),
                shift_count: t.count,
                avg_duration: round2(t.duration / t.count as f64),
                total_overtime: round2(t.overtime),
            })
            .collect();

        let failed_drops_by_date = drops
            .into_iter()
            .rev()
            .map(|(date, mut per_driver)| {
                per_driver.sort_by(|a, b| b.1.failed.cmp(&a.1.failed));
                let total: u64 = per_driver.iter().map(|(_, d)| d.total).sum();
                let failed: u64 = per_driver.iter().map(|(_, d)| d.failed).sum();
                FailedDropsDay {
                    date: format_date(&date),
                    total_drops: total,
                    failed_drops: failed,
                    failure_rate: failure_rate(failed, total),
                    drivers: per_driver
                        .into_iter()
                        .map(|(driver_id, d)| DriverDrops {
                            driver_id,
                            driver_name: d.name,
                            total_drops: d.total,
                            failed_drops: d.failed,
                            failure_rate: failure_rate(d.failed, d.total),
                        })
                        .collect(),
                }
            })
            .collect();

        let overtime_by_date = overtime
            .into_iter()
            .rev()
            .map(|(date, mut per_driver)| {
                per_driver.sort_by(|a, b| b.1.overtime.total_cmp(&a.1.overtime));
                let total: f64 = per_driver.iter().map(|(_, o)| o.overtime).sum();
                OvertimeDay {
                    date: format_date(&date),
                    total_overtime: round2(total),
                    drivers: per_driver
                        .into_iter()
                        .map(|(driver_id, o)| DriverOvertime {
                            driver_id,
                            driver_name: o.name,
                            overtime_hours: round2(o.overtime),
                            shift_hours: round2(o.hours),
                        })
                        .collect(),
                }
            })
            .collect();

        helper_companies.sort_by(|a, b| b.1.cmp(&a.1));
        helper_companies.truncate(settings.top_helper_companies);

        Dashboard {
            active_count: active.len(),
            active_drivers: active,
            punch_out_misses: misses,
            vehicle_run_time,
            shift_trend_by_date,
            failed_drops_by_date,
            overtime_by_date,
            today_stats: TodayStats {
                avg_shift_duration: if today_count == 0 {
                    0.0
                } else {
                    round2(today_duration / today_count as f64)
                },
                total_failed_drops: today_failed,
                top_helper_companies: helper_companies
                    .into_iter()
                    .map(|(company, count)| HelperCompanyCount { company, count })
                    .collect(),
                completed_shifts_count: today_count,
            },
        }
    }

    /// Kilometres per vehicle and stage gaps for one shift date.
    pub fn detail(records: &[ShiftRecord], date: NaiveDate) -> DashboardDetail {
        let mut km: Vec<(String, f64)> = Vec::new();
        let mut gaps = Vec::new();

        for r in records.iter().filter(|r| r.shift_date == date) {
            gaps.push(stage_gaps(r));

            if !r.is_complete() {
                continue;
            }
            if let Some(end) = r.end_odometer {
                if r.start_odometer > 0.0 && end > 0.0 {
                    *slot(&mut km, &r.vehicle_number) += (end - r.start_odometer).max(0.0);
                }
            }
        }

        DashboardDetail {
            date: format_date(&date),
            vehicle_km: sorted_totals(km)
                .into_iter()
                .map(|(vehicle_number, total)| VehicleKm {
                    vehicle_number,
                    total_km: round2(total),
                })
                .collect(),
            stage_gaps: gaps,
        }
    }

    /// Completed hours per vehicle for shift dates in `from..=to`.
    pub fn vehicle_hours(
        records: &[ShiftRecord],
        from: NaiveDate,
        to: NaiveDate,
    ) -> AppResult<Vec<VehicleHours>> {
        if from > to {
            return Err(AppError::Validation(format!(
                "Range start {} is after its end {}.",
                format_date(&from),
                format_date(&to)
            )));
        }

        let mut hours: Vec<(String, f64)> = Vec::new();
        for r in records
            .iter()
            .filter(|r| r.counts_as_completed() && r.shift_date >= from && r.shift_date <= to)
        {
            *slot(&mut hours, &r.vehicle_number) += r.duration();
        }

        Ok(sorted_totals(hours)
            .into_iter()
            .map(|(vehicle_number, total)| VehicleHours {
                vehicle_number,
                total_hours: round2(total),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::stage::ShiftStage;
    use crate::utils::time::parse_civil;

    fn at(s: &str) -> NaiveDateTime {
        parse_civil(s).unwrap()
    }

    fn open(row_id: &str, driver: &str, arrival: &str) -> ShiftRecord {
        let arrival = at(arrival);
        ShiftRecord {
            row_id: row_id.into(),
            shift_date: arrival.date(),
            driver_id: driver.into(),
            driver_name: format!("Driver {driver}"),
            helper_id: None,
            helper_name: None,
            helper_company: None,
            vehicle_number: "V1".into(),
            start_odometer: 1000.0,
            start_photo_url: "u".into(),
            fuel_taken: None,
            destination_emirate: "Dubai".into(),
            primary_customer: "C".into(),
            total_drops: 0,
            arrival_at_gate: arrival,
            departure_from_warehouse: None,
            last_drop_time: None,
            last_drop_photo_url: None,
            last_drop_submit_timestamp: None,
            failed_drops: None,
            shift_complete_time: None,
            end_odometer: None,
            end_photo_url: None,
            shift_duration_hours: None,
            overtime_hours: None,
            stage: ShiftStage::Arrived,
            departure_auto: false,
        }
    }

    fn done(row_id: &str, driver: &str, arrival: &str, hours: f64) -> ShiftRecord {
        let mut r = open(row_id, driver, arrival);
        let complete = r.arrival_at_gate + TimeDelta::minutes((hours * 60.0) as i64);
        r.departure_from_warehouse = Some(r.arrival_at_gate + TimeDelta::hours(1));
        r.last_drop_submit_timestamp = Some(complete - TimeDelta::minutes(30));
        r.shift_complete_time = Some(complete);
        r.shift_duration_hours = Some(hours);
        r.overtime_hours = Some(round2((hours - 9.0).max(0.0)));
        r.failed_drops = Some(0);
        r.end_odometer = Some(r.start_odometer + 100.0);
        r.stage = ShiftStage::Complete;
        r
    }

    #[test]
    fn empty_table_gives_zero_shape() {
        let d = DashboardLogic::build(&[], at("01/01/2024 12:00"), &DashboardSettings::default());
        assert_eq!(d, Dashboard::default());

        let detail = DashboardLogic::detail(&[], at("01/01/2024 12:00").date());
        assert!(detail.vehicle_km.is_empty() && detail.stage_gaps.is_empty());
        assert_eq!(detail.date, "01/01/2024");
    }

    #[test]
    fn active_and_punch_out_misses() {
        let mut departed = open("R2", "B", "01/01/2024 06:00");
        departed.departure_from_warehouse = Some(at("01/01/2024 07:00"));
        departed.stage = ShiftStage::Departed;

        let records = vec![
            open("R1", "A", "31/12/2023 22:00"),
            departed,
            done("R3", "C", "01/01/2024 05:00", 6.0),
        ];
        let d = DashboardLogic::build(&records, at("01/01/2024 16:00"), &DashboardSettings::default());

        assert_eq!(d.active_count, 2);
        assert_eq!(d.active_drivers[0].driver_id, "A");
        assert_eq!(d.active_drivers[0].running_hours, 18.0);
        assert!(d.active_drivers[0].is_overtime);
        assert_eq!(d.active_drivers[1].current_stage, 2);
        assert_eq!(d.active_drivers[1].running_hours, 10.0);

        assert_eq!(d.punch_out_misses.len(), 1);
        assert_eq!(d.punch_out_misses[0].row_id, "R1");
        assert_eq!(d.punch_out_misses[0].shift_date, "31/12/2023");
        assert_eq!(d.punch_out_misses[0].stuck_stage, 2);
    }

    #[test]
    fn completed_aggregates_and_today_stats() {
        let mut a = done("R1", "A", "01/01/2024 06:00", 10.5);
        a.total_drops = 40;
        a.failed_drops = Some(5);
        a.helper_company = Some("Acme".into());
        let mut b = done("R2", "B", "01/01/2024 07:00", 8.0);
        b.vehicle_number = "V2".into();
        b.helper_company = Some("Blue".into());
        let mut c = done("R3", "C", "02/01/2024 07:00", 9.25);
        c.total_drops = 0;
        c.helper_company = Some("Blue".into());
        let mut d_open = open("R4", "D", "02/01/2024 08:00");
        d_open.helper_company = Some("Blue".into());

        let records = vec![a, b, c, d_open];
        let d = DashboardLogic::build(&records, at("02/01/2024 18:00"), &DashboardSettings::default());

        assert_eq!(
            d.vehicle_run_time,
            vec![
                VehicleHours { vehicle_number: "V1".into(), total_hours: 19.75 },
                VehicleHours { vehicle_number: "V2".into(), total_hours: 8.0 },
            ]
        );

        let dates: Vec<&str> = d.shift_trend_by_date.iter().map(|t| t.date.as_str()).collect();
        assert_eq!(dates, vec!["01/01/2024", "02/01/2024"]);
        assert_eq!(d.shift_trend_by_date[0].shift_count, 2);
        assert_eq!(d.shift_trend_by_date[0].avg_duration, 9.25);
        assert_eq!(d.shift_trend_by_date[0].total_overtime, 1.5);

        assert_eq!(d.failed_drops_by_date[0].date, "02/01/2024");
        assert_eq!(d.failed_drops_by_date[0].failure_rate, 0.0);
        let jan1 = &d.failed_drops_by_date[1];
        assert_eq!((jan1.total_drops, jan1.failed_drops), (40, 5));
        assert_eq!(jan1.failure_rate, 12.5);
        assert_eq!(jan1.drivers[0].driver_id, "A");

        assert_eq!(d.overtime_by_date.len(), 2);
        assert_eq!(d.overtime_by_date[0].date, "02/01/2024");
        assert_eq!(d.overtime_by_date[0].total_overtime, 0.25);
        assert_eq!(d.overtime_by_date[1].drivers.len(), 1);

        let today = &d.today_stats;
        assert_eq!(today.completed_shifts_count, 1);
        assert_eq!(today.avg_shift_duration, 9.25);
        assert_eq!(
            today.top_helper_companies,
            vec![HelperCompanyCount { company: "Blue".into(), count: 2 }]
        );
    }

    #[test]
    fn trend_window_drops_old_arrivals() {
        let records = vec![
            done("R1", "A", "01/01/2024 06:00", 8.0),
            done("R2", "A", "20/02/2024 06:00", 8.0),
        ];
        let d = DashboardLogic::build(&records, at("01/03/2024 12:00"), &DashboardSettings::default());
        assert_eq!(d.shift_trend_by_date.len(), 1);
        assert_eq!(d.shift_trend_by_date[0].date, "20/02/2024");
        // vehicle hours have no window
        assert_eq!(d.vehicle_run_time[0].total_hours, 16.0);
    }

    #[test]
    fn helper_company_ties_keep_encounter_order() {
        let companies = ["Zed", "Acme", "Zed", "Acme", "Mid", "One", "Two", "Three"];
        let records: Vec<ShiftRecord> = companies
            .iter()
            .enumerate()
            .map(|(i, c)| {
                let mut r = open(&format!("R{i}"), &format!("D{i}"), "05/05/2024 08:00");
                r.helper_company = Some(c.to_string());
                r
            })
            .collect();

        let d = DashboardLogic::build(&records, at("05/05/2024 12:00"), &DashboardSettings::default());
        let top: Vec<&str> = d
            .today_stats
            .top_helper_companies
            .iter()
            .map(|h| h.company.as_str())
            .collect();
        assert_eq!(top, vec!["Zed", "Acme", "Mid", "One", "Two"]);
    }

    #[test]
    fn detail_sums_kilometres_and_flags_backfilled_departure() {
        let mut first = done("R1", "A", "01/01/2024 06:00", 4.0);
        first.start_odometer = 1000.0;
        first.end_odometer = Some(1100.0);
        let mut second = done("R2", "B", "01/01/2024 11:00", 4.0);
        second.start_odometer = 1100.0;
        second.end_odometer = Some(1250.0);
        second.departure_from_warehouse = second.shift_complete_time;
        second.departure_auto = true;
        let other_day = done("R3", "C", "02/01/2024 06:00", 4.0);

        let records = vec![first, second, other_day];
        let detail = DashboardLogic::detail(&records, at("01/01/2024 00:00").date());

        assert_eq!(
            detail.vehicle_km,
            vec![VehicleKm { vehicle_number: "V1".into(), total_km: 250.0 }]
        );
        assert_eq!(detail.stage_gaps.len(), 2);
        assert_eq!(detail.stage_gaps[0].arrival_to_departure, Some(1.0));
        assert_eq!(detail.stage_gaps[0].last_drop_to_complete, Some(0.5));

        let backfilled = &detail.stage_gaps[1];
        assert_eq!(backfilled.arrival_to_departure, None);
        assert_eq!(backfilled.departure_to_last_drop, None);
        assert_eq!(backfilled.last_drop_to_complete, Some(0.5));
        assert!(backfilled.departure_auto_filled);
        assert!(backfilled.is_complete);
    }

    #[test]
    fn vehicle_hours_range_is_inclusive() {
        let mut b = done("R2", "B", "03/01/2024 06:00", 6.0);
        b.vehicle_number = "V2".into();
        let records = vec![
            done("R1", "A", "01/01/2024 06:00", 5.0),
            b,
            done("R3", "A", "04/01/2024 06:00", 5.0),
            open("R4", "C", "02/01/2024 06:00"),
        ];
        let from = at("01/01/2024 00:00").date();
        let to = at("03/01/2024 00:00").date();

        let hours = DashboardLogic::vehicle_hours(&records, from, to).unwrap();
        assert_eq!(hours.len(), 2);
        assert_eq!(hours[0].vehicle_number, "V2");
        assert_eq!(hours[1].total_hours, 5.0);

        assert!(DashboardLogic::vehicle_hours(&records, to, from).is_err());
    }

    #[test]
    fn drop_totals_do_not_overflow_on_large_counts() {
        let mut a = done("R1", "A", "01/01/2024 06:00", 8.0);
        a.total_drops = 3_000_000_000;
        a.failed_drops = Some(3_000_000_000);
        let mut b = done("R2", "A", "01/01/2024 15:00", 8.0);
        b.total_drops = 3_000_000_000;
        b.failed_drops = Some(1_000_000_000);

        let d = DashboardLogic::build(&[a, b], at("01/01/2024 23:30"), &DashboardSettings::default());

        let day = &d.failed_drops_by_date[0];
        assert_eq!(day.total_drops, 6_000_000_000);
        assert_eq!(day.failed_drops, 4_000_000_000);
        assert_eq!(day.failure_rate, 66.7);
        assert_eq!(day.drivers[0].total_drops, 6_000_000_000);
        assert_eq!(d.today_stats.total_failed_drops, 4_000_000_000);
    }
}
