use crate::db::attendance::{AttendanceRecord, AttendanceSummary};
use crate::db::expenses::{Expense, ExpenseSummary};
use crate::db::kpi::{Indicator, KpiOverviewRow, ProgressRecord, Target};
use crate::db::members::Member;
use crate::db::news::Article;
use crate::db::recruitment::{Candidate, Stage};
use crate::db::schedules::Schedule;
use crate::libs::calendar::MonthCalendar;
use crate::libs::formatter::{
    format_amount, format_datetime, format_duration, format_rate, format_time, format_value, member_name, or_dash,
};
use anyhow::Result;
use chrono::Local;
use prettytable::{row, Table};
use std::collections::HashMap;

pub struct View {}

impl View {
    pub fn attendance(records: &[AttendanceRecord], names: &HashMap<i64, String>) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["ID", "DATE", "MEMBER", "IN", "OUT", "BREAK", "WORKED", "STATUS", "NOTE"]);
        for record in records {
            table.add_row(row![
                record.id.unwrap_or(0),
                record.work_date,
                member_name(names, record.member_id),
                format_time(Some(&record.check_in)),
                format_time(record.check_out.as_ref()),
                record.break_minutes,
                record.worked().map(|w| format_duration(&w)).unwrap_or_else(|| "-".to_string()),
                record.status,
                or_dash(record.note.as_deref())
            ]);
        }
        table.printstd();

        Ok(())
    }

    pub fn attendance_summary(summaries: &[AttendanceSummary], names: &HashMap<i64, String>) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["MEMBER", "DAYS", "LATE", "REMOTE", "LEAVE", "ABSENT", "OPEN", "WORKED", "OVERTIME"]);
        for s in summaries {
            table.add_row(row![
                member_name(names, s.member_id),
                s.days,
                s.late_days,
                s.remote_days,
                s.leave_days,
                s.absent_days,
                s.open_days,
                format_duration(&s.worked),
                format_duration(&s.overtime)
            ]);
        }
        table.printstd();

        Ok(())
    }

    pub fn schedules(schedules: &[Schedule]) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["ID", "START", "END", "TITLE", "CATEGORY", "LOCATION"]);
        for schedule in schedules {
            table.add_row(row![
                schedule.id.unwrap_or(0),
                format_datetime(&schedule.start_at),
                format_datetime(&schedule.end_at),
                schedule.title,
                schedule.category,
                or_dash(schedule.location.as_deref())
            ]);
        }
        table.printstd();

        Ok(())
    }

    pub fn indicators(indicators: &[Indicator]) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["ID", "NAME", "UNIT", "CATEGORY", "DESCRIPTION"]);
        for indicator in indicators {
            table.add_row(row![
                indicator.id.unwrap_or(0),
                indicator.name,
                indicator.unit,
                indicator.category,
                or_dash(indicator.description.as_deref())
            ]);
        }
        table.printstd();

        Ok(())
    }

    pub fn targets(targets: &[Target], indicators: &[Indicator], names: &HashMap<i64, String>) -> Result<()> {
        let indicator_names: HashMap<i64, &str> = indicators
            .iter()
            .filter_map(|i| i.id.map(|id| (id, i.name.as_str())))
            .collect();
        let mut table = Table::new();

        table.add_row(row!["ID", "PERIOD", "MEMBER", "INDICATOR", "TARGET"]);
        for target in targets {
            table.add_row(row![
                target.id.unwrap_or(0),
                target.period,
                member_name(names, target.member_id),
                indicator_names.get(&target.indicator_id).copied().unwrap_or("-"),
                format_value(target.target_value)
            ]);
        }
        table.printstd();

        Ok(())
    }

    pub fn progress(records: &[ProgressRecord]) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["ID", "RECORDED", "VALUE", "NOTE"]);
        for record in records {
            table.add_row(row![
                record.id.unwrap_or(0),
                record.recorded_at.with_timezone(&Local).format("%Y-%m-%d %H:%M"),
                format_value(record.value),
                or_dash(record.note.as_deref())
            ]);
        }
        table.printstd();

        Ok(())
    }

    pub fn kpi_overview(rows: &[KpiOverviewRow], names: &HashMap<i64, String>) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["TARGET", "MEMBER", "INDICATOR", "CATEGORY", "CURRENT", "GOAL", "RATE"]);
        for r in rows {
            table.add_row(row![
                r.target_id,
                member_name(names, r.member_id),
                r.indicator,
                r.category,
                format!("{} {}", format_value(r.current), r.unit),
                format!("{} {}", format_value(r.target_value), r.unit),
                format_rate(r.rate)
            ]);
        }
        table.printstd();

        Ok(())
    }

    pub fn candidates(candidates: &[Candidate]) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["ID", "NAME", "POSITION", "STAGE", "INTERVIEW", "INTERVIEWER", "RATING"]);
        for c in candidates {
            table.add_row(row![
                c.id.unwrap_or(0),
                c.candidate_name,
                c.position,
                c.stage,
                c.interview_at.as_ref().map(format_datetime).unwrap_or_else(|| "-".to_string()),
                or_dash(c.interviewer.as_deref()),
                c.rating.map(|r| r.to_string()).unwrap_or_else(|| "-".to_string())
            ]);
        }
        table.printstd();

        Ok(())
    }

    pub fn pipeline(counts: &[(Stage, usize)]) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["STAGE", "CANDIDATES"]);
        for (stage, count) in counts {
            table.add_row(row![stage, count]);
        }
        table.printstd();

        Ok(())
    }

    pub fn articles(articles: &[Article]) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["ID", "TITLE", "CATEGORY", "STATUS", "PUBLISHED", "UPDATED"]);
        for a in articles {
            table.add_row(row![
                a.id.unwrap_or(0),
                a.title,
                a.category,
                if a.is_published { "published" } else { "draft" },
                a.published_at
                    .map(|p| p.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_else(|| "-".to_string()),
                a.updated_at.with_timezone(&Local).format("%Y-%m-%d %H:%M")
            ]);
        }
        table.printstd();

        Ok(())
    }

    pub fn article(article: &Article) -> Result<()> {
        println!("{}\n", article.title);
        if let Some(summary) = &article.summary {
            println!("{}\n", summary);
        }
        println!("{}", article.body);

        Ok(())
    }

    pub fn expenses(expenses: &[Expense]) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["ID", "MONTH", "CATEGORY", "AMOUNT", "DESCRIPTION"]);
        for e in expenses {
            table.add_row(row![
                e.id.unwrap_or(0),
                e.month,
                e.category,
                r->format_amount(e.amount),
                or_dash(e.description.as_deref())
            ]);
        }
        table.printstd();

        Ok(())
    }

    pub fn expense_summary(summary: &ExpenseSummary) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["CATEGORY", "AMOUNT", "SHARE"]);
        for (category, amount) in &summary.by_category {
            let share = if summary.total > 0.0 { amount / summary.total * 100.0 } else { 0.0 };
            table.add_row(row![category, r->format_amount(*amount), r->format_rate(share)]);
        }
        table.add_row(row!["TOTAL", r->format_amount(summary.total), ""]);
        table.printstd();

        Ok(())
    }

    pub fn members(members: &[Member]) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["ID", "NAME", "EMAIL", "ROLE", "ACTIVE", "LOGINS", "LAST LOGIN"]);
        for m in members {
            table.add_row(row![
                m.id.unwrap_or(0),
                m.name,
                m.email,
                m.role,
                if m.is_active { "yes" } else { "no" },
                m.login_count,
                m.last_login_at
                    .map(|t| t.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_else(|| "-".to_string())
            ]);
        }
        table.printstd();

        Ok(())
    }

    pub fn calendar(calendar: &MonthCalendar) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["DATE", "TIME", "KIND", "ENTRY", "DETAIL"]);
        for (date, entries) in calendar {
            for (index, entry) in entries.iter().enumerate() {
                let day = if index == 0 { date.format("%a %d").to_string() } else { String::new() };
                table.add_row(row![
                    day,
                    entry.time.map(|t| t.format("%H:%M").to_string()).unwrap_or_else(|| "all day".to_string()),
                    entry.kind,
                    entry.title,
                    or_dash(entry.detail.as_deref())
                ]);
            }
        }
        table.printstd();

        Ok(())
    }
}
