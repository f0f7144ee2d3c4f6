use serde::Deserialize;
use tracing::info;

use super::{ensure_unique, fetch, fetch_mut, BulkActionOutcome, HostelAdmin, ServiceError};
use crate::hostel::domain::{
    ItemCategory, ItemStatus, LostItem, LostItemId, LostItemPatch, NewLostItem, NewStipend,
    PaymentMethod, ProfileId, StipendId, StipendTransaction,
};
use crate::hostel::query::{matches, matches_search, Page, PageRequest};
use crate::hostel::repository::HostelRepository;

/// Changelist filters for stipend payouts. Search covers the reference number.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct StipendFilter {
    pub student: Option<ProfileId>,
    pub payment_method: Option<PaymentMethod>,
    pub search: Option<String>,
}

/// Changelist filters for lost-and-found reports. Search covers item name and location.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LostItemFilter {
    pub status: Option<ItemStatus>,
    pub category: Option<ItemCategory>,
    pub reporter: Option<ProfileId>,
    pub search: Option<String>,
}

impl<R> HostelAdmin<R>
where
    R: HostelRepository + 'static,
{
    pub fn record_stipend(&self, draft: NewStipend) -> Result<StipendTransaction, ServiceError> {
        let now = self.now();
        let stipend = self.repository.write(|tables| {
            fetch(&tables.student_profiles, draft.student)?;
            fetch(&tables.users, draft.processed_by)?;
            let stipend = tables
                .stipend_transactions
                .insert_with(|id| draft.into_record(id, now));
            stipend.validate()?;
            ensure_unique(
                &tables.stipend_transactions,
                stipend.id,
                "reference_number",
                &stipend.reference_number,
                |row| row.reference_number.as_str(),
            )?;
            Ok::<_, ServiceError>(stipend)
        })?;

        info!(
            stipend_id = %stipend.id,
            student = %stipend.student,
            amount = %stipend.amount,
            reference = %stipend.reference_number,
            "stipend recorded"
        );
        Ok(stipend)
    }

    pub fn get_stipend(&self, id: StipendId) -> Result<StipendTransaction, ServiceError> {
        self.repository
            .read(|tables| fetch(&tables.stipend_transactions, id).cloned())?
    }

    /// Latest payouts first.
    pub fn list_stipends(
        &self,
        filter: &StipendFilter,
        page: PageRequest,
    ) -> Result<Page<StipendTransaction>, ServiceError> {
        let mut rows = self.repository.read(|tables| {
            tables
                .stipend_transactions
                .iter()
                .filter(|stipend| {
                    matches(filter.student, stipend.student)
                        && matches(filter.payment_method, stipend.payment_method)
                        && matches_search(
                            filter.search.as_deref(),
                            &[stipend.reference_number.as_str()],
                        )
                })
                .cloned()
                .collect::<Vec<_>>()
        })?;
        rows.sort_by(|a, b| {
            b.transaction_date
                .cmp(&a.transaction_date)
                .then(b.id.cmp(&a.id))
        });
        Ok(Page::paginate(rows, page, self.list_per_page))
    }

    pub fn delete_stipend(&self, id: StipendId) -> Result<StipendTransaction, ServiceError> {
        self.repository.write(|tables| {
            tables
                .stipend_transactions
                .remove(id)
                .ok_or_else(|| ServiceError::not_found::<StipendTransaction>(id))
        })
    }

    /// Files a lost-and-found report, expiring thirty days out unless told otherwise.
    pub fn report_lost_item(&self, draft: NewLostItem) -> Result<LostItem, ServiceError> {
        let now = self.now();
        let item = self.repository.write(|tables| {
            fetch(&tables.student_profiles, draft.reporter)?;
            let item = tables
                .lost_items
                .insert_with(|id| draft.into_record(id, now));
            item.validate()?;
            Ok::<_, ServiceError>(item)
        })?;

        info!(
            lost_item_id = %item.id,
            reporter = %item.reporter,
            category = item.category.value(),
            "lost item reported"
        );
        Ok(item)
    }

    pub fn update_lost_item(
        &self,
        id: LostItemId,
        patch: LostItemPatch,
    ) -> Result<LostItem, ServiceError> {
        self.repository.write(|tables| {
            let item = fetch_mut(&mut tables.lost_items, id)?;
            patch.apply(item);
            item.validate()?;
            Ok(item.clone())
        })
    }

    pub fn get_lost_item(&self, id: LostItemId) -> Result<LostItem, ServiceError> {
        self.repository
            .read(|tables| fetch(&tables.lost_items, id).cloned())?
    }

    /// Newest reports first.
    pub fn list_lost_items(
        &self,
        filter: &LostItemFilter,
        page: PageRequest,
    ) -> Result<Page<LostItem>, ServiceError> {
        let mut rows = self.repository.read(|tables| {
            tables
                .lost_items
                .iter()
                .filter(|item| {
                    matches(filter.status, item.status)
                        && matches(filter.category, item.category)
                        && matches(filter.reporter, item.reporter)
                        && matches_search(
                            filter.search.as_deref(),
                            &[item.item_name.as_str(), item.lost_location.as_str()],
                        )
                })
                .cloned()
                .collect::<Vec<_>>()
        })?;
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(Page::paginate(rows, page, self.list_per_page))
    }

    pub fn delete_lost_item(&self, id: LostItemId) -> Result<LostItem, ServiceError> {
        self.repository.write(|tables| {
            tables
                .lost_items
                .remove(id)
                .ok_or_else(|| ServiceError::not_found::<LostItem>(id))
        })
    }

    /// Bulk action: moves every overdue lost or found report to `expired`.
    pub fn expire_lost_items(&self) -> Result<BulkActionOutcome, ServiceError> {
        let now = self.now();
        let affected = self.repository.write(|tables| {
            let mut affected = 0;
            for item in tables
                .lost_items
                .iter_mut()
                .filter(|item| item.is_overdue(now))
            {
                item.status = ItemStatus::Expired;
                affected += 1;
            }
            Ok::<_, ServiceError>(affected)
        })?;

        info!(action = "mark_expired", affected, "lost item bulk action applied");
        Ok(BulkActionOutcome {
            action: "mark_expired",
            affected,
            message: format!("{affected} lost items marked as expired."),
        })
    }
}
