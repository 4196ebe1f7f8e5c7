use ts_rs::TS;

fn generate_types_content() -> String {
    let decls = [
        utils::response::ApiResponse::<()>::decl(),
        db::models::user::User::decl(),
        db::models::user::CreateUser::decl(),
        db::models::category::Category::decl(),
        db::models::category::SaveCategory::decl(),
        db::models::activity::Activity::decl(),
        db::models::activity::SaveActivity::decl(),
        db::models::quarter::Quarter::decl(),
        db::models::comment::Comment::decl(),
        db::models::comment::SaveComment::decl(),
        services::services::timesheet::ActivitySummary::decl(),
        services::services::timesheet::TimeSheet::decl(),
        services::services::week::Week::decl(),
        services::services::report::Report::decl(),
        services::services::report::WeekOverview::decl(),
        services::services::summary::SummaryEntry::decl(),
        services::services::summary::SheetSummary::decl(),
        services::services::sheet::SheetUpdate::decl(),
        services::services::sheet::SheetSlot::decl(),
        services::services::sheet::SheetView::decl(),
        services::services::catalog::CategoryOverview::decl(),
        services::services::catalog::ActivityWithUsage::decl(),
        services::services::catalog::CategoryWithActivities::decl(),
    ];

    let body = decls
        .into_iter()
        .map(|d| {
            let trimmed = d.trim_start();
            if trimmed.starts_with("export") {
                d
            } else {
                format!("export {}", trimmed)
            }
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "// This file was generated by `generate_types`. Do not edit by hand.\n\n{}\n",
        body
    )
}

fn main() {
    print!("{}", generate_types_content());
}
