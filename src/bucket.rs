//! The bucket summary: how much was credited to and debited from each bucket.

use maud::{Markup, html};

use crate::{
    html::{CARD_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, format_cents},
    transaction::{Transaction, TransactionType},
};

/// The totals of one bucket, in cents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketTotal {
    /// The bucket label as typed on the transactions.
    pub bucket: String,
    /// The sum of credited amounts.
    pub credits: i64,
    /// The sum of debited amounts.
    pub debits: i64,
}

impl BucketTotal {
    fn new(bucket: &str) -> Self {
        Self {
            bucket: bucket.to_owned(),
            credits: 0,
            debits: 0,
        }
    }

    /// Credits minus debits.
    ///
    /// Sums are saturating, so totals past the range of `i64` are clamped
    /// rather than wrapped.
    pub fn net(&self) -> i64 {
        self.credits.saturating_sub(self.debits)
    }
}

/// Group `transactions` by bucket, in the order each bucket first appears.
pub fn summarize_buckets(transactions: &[Transaction]) -> Vec<BucketTotal> {
    let mut totals: Vec<BucketTotal> = Vec::new();

    for transaction in transactions {
        let index = match totals
            .iter()
            .position(|total| total.bucket == transaction.bucket)
        {
            Some(index) => index,
            None => {
                totals.push(BucketTotal::new(&transaction.bucket));
                totals.len() - 1
            }
        };

        let total = &mut totals[index];
        let sum = match transaction.type_ {
            TransactionType::Credit => &mut total.credits,
            TransactionType::Debit => &mut total.debits,
        };
        *sum = sum.saturating_add(transaction.amount);
    }

    totals
}

/// The bucket summary card.
pub(crate) fn bucket_summary_view(transactions: &[Transaction]) -> Markup {
    render_bucket_summary(transactions, false)
}

/// The bucket summary card as an out-of-band swap, sent whenever the ledger changes.
pub(crate) fn bucket_summary_oob_view(transactions: &[Transaction]) -> Markup {
    render_bucket_summary(transactions, true)
}

fn render_bucket_summary(transactions: &[Transaction], is_oob: bool) -> Markup {
    let totals = summarize_buckets(transactions);
    let overall_net = totals
        .iter()
        .map(BucketTotal::net)
        .fold(0i64, i64::saturating_add);

    html! {
        section id="buckets" class=(CARD_STYLE) hx-swap-oob=[is_oob.then_some("true")]
        {
            h2 class="text-xl font-semibold mb-4" { "Buckets" }

            @if totals.is_empty() {
                p class="text-gray-500 dark:text-gray-400" { "No transactions yet." }
            } @else {
                div class="relative overflow-x-auto"
                {
                    table class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "Bucket" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Credits" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Debits" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Net" }
                            }
                        }

                        tbody
                        {
                            @for total in &totals {
                                tr class=(TABLE_ROW_STYLE) data-bucket=(total.bucket)
                                {
                                    th scope="row" class=(TABLE_CELL_STYLE) { (total.bucket) }
                                    td class=(TABLE_CELL_STYLE) { (format_cents(total.credits)) }
                                    td class=(TABLE_CELL_STYLE) { (format_cents(total.debits)) }
                                    td class=(TABLE_CELL_STYLE) data-net="true" { (format_cents(total.net())) }
                                }
                            }
                        }
                    }
                }

                p class="mt-4 font-semibold"
                {
                    "Net: "
                    span id="overall-net" { (format_cents(overall_net)) }
                }
            }
        }
    }
}

#[cfg(test)]
mod summarize_tests {
    use crate::{
        transaction::{TransactionType, test_utils::transaction},
        user::UserId,
    };

    use super::{BucketTotal, summarize_buckets};

    #[test]
    fn debits_subtract_from_credits() {
        let user_id = UserId::new("u1");
        let transactions = vec![
            transaction(1, 500, TransactionType::Credit, "food", &user_id),
            transaction(2, 300, TransactionType::Debit, "food", &user_id),
        ];

        let totals = summarize_buckets(&transactions);

        assert_eq!(
            totals,
            vec![BucketTotal {
                bucket: "food".to_owned(),
                credits: 500,
                debits: 300,
            }]
        );
        assert_eq!(totals[0].net(), 200);
    }

    #[test]
    fn buckets_keep_first_appearance_order() {
        let user_id = UserId::new("u1");
        let transactions = vec![
            transaction(1, 100, TransactionType::Debit, "rent", &user_id),
            transaction(2, 200, TransactionType::Debit, "food", &user_id),
            transaction(3, 300, TransactionType::Credit, "rent", &user_id),
        ];

        let buckets: Vec<_> = summarize_buckets(&transactions)
            .into_iter()
            .map(|total| (total.bucket.clone(), total.net()))
            .collect();

        assert_eq!(
            buckets,
            vec![("rent".to_owned(), 200), ("food".to_owned(), -200)]
        );
    }

    #[test]
    fn huge_totals_saturate_instead_of_overflowing() {
        let user_id = UserId::new("u1");
        let huge = 8_999_999_999_999_997_952;
        let transactions = vec![
            transaction(1, huge, TransactionType::Credit, "food", &user_id),
            transaction(2, huge, TransactionType::Credit, "food", &user_id),
            transaction(3, huge, TransactionType::Credit, "rent", &user_id),
        ];

        let totals = summarize_buckets(&transactions);

        assert_eq!(totals[0].credits, i64::MAX);
        assert_eq!(totals[0].net(), i64::MAX);
        assert_eq!(totals[1].net(), huge);
    }

    #[test]
    fn empty_collection_has_no_buckets() {
        assert!(summarize_buckets(&[]).is_empty());
    }
}
