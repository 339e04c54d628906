use std::collections::HashMap;

use async_trait::async_trait;
use garda_application::SequenceAllocator;
use garda_core::{AppResult, OrgPrefix};
use tokio::sync::Mutex;

/// In-memory permanent-number counter.
///
/// One lock serializes every increment, so concurrent approvals for the
/// same `(org, year)` pair always receive distinct sequence values.
#[derive(Debug, Default)]
pub struct InMemorySequenceAllocator {
    counters: Mutex<HashMap<(String, i32), u32>>,
}

impl InMemorySequenceAllocator {
    /// Creates an allocator with no counters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a counter, e.g. when importing an existing register.
    pub async fn seed(&self, org: &OrgPrefix, year: i32, last_used: u32) {
        self.counters
            .lock()
            .await
            .insert((org.as_str().to_owned(), year), last_used);
    }
}

#[async_trait]
impl SequenceAllocator for InMemorySequenceAllocator {
    async fn next_sequence(&self, org: &OrgPrefix, year: i32) -> AppResult<u32> {
        let mut counters = self.counters.lock().await;
        let counter = counters.entry((org.as_str().to_owned(), year)).or_insert(0);
        *counter += 1;
        Ok(*counter)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::sync::Arc;

    use garda_application::SequenceAllocator;
    use garda_core::OrgPrefix;

    use super::InMemorySequenceAllocator;

    fn org(value: &str) -> OrgPrefix {
        match OrgPrefix::new(value) {
            Ok(prefix) => prefix,
            Err(_) => panic!("test org prefix must be valid"),
        }
    }

    #[tokio::test]
    async fn sequences_are_independent_per_org_and_year() {
        let allocator = InMemorySequenceAllocator::new();

        assert_eq!(allocator.next_sequence(&org("FIN"), 2025).await.unwrap_or(0), 1);
        assert_eq!(allocator.next_sequence(&org("FIN"), 2025).await.unwrap_or(0), 2);
        assert_eq!(allocator.next_sequence(&org("FIN"), 2024).await.unwrap_or(0), 1);
        assert_eq!(allocator.next_sequence(&org("OPS"), 2025).await.unwrap_or(0), 1);
    }

    #[tokio::test]
    async fn seeding_continues_an_imported_register() {
        let allocator = InMemorySequenceAllocator::new();
        allocator.seed(&org("FIN"), 2025, 41).await;

        assert_eq!(allocator.next_sequence(&org("FIN"), 2025).await.unwrap_or(0), 42);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_allocation_yields_distinct_sequences() {
        let allocator = Arc::new(InMemorySequenceAllocator::new());
        let mut handles = Vec::new();

        for _ in 0..32 {
            let allocator = allocator.clone();
            handles.push(tokio::spawn(async move {
                allocator.next_sequence(&org("FIN"), 2025).await
            }));
        }

        let mut allocated = BTreeSet::new();
        for handle in handles {
            let sequence = match handle.await {
                Ok(Ok(sequence)) => sequence,
                _ => panic!("allocation task must succeed"),
            };
            allocated.insert(sequence);
        }

        let expected: BTreeSet<u32> = (1..=32).collect();
        assert_eq!(allocated, expected);
    }

    mod approval_flow {
        use std::collections::BTreeSet;
        use std::sync::Arc;

        use garda_application::{
            AccessConfig, ApprovalWorkflow, PermissionService, ProvenanceStamper,
            RiskNumberService, RiskService, SuperadminPolicy,
        };
        use garda_core::{UserId, UserIdentity};
        use garda_domain::{MenuDefinition, MenuKey, Permission, PermissionMask, Role, RoleId};

        use crate::{
            InMemoryAccessRepository, InMemoryAuditRepository, InMemoryRiskRepository, SystemClock,
        };

        use super::super::InMemorySequenceAllocator;
        use super::org;

        fn menu(value: &str) -> MenuKey {
            match MenuKey::new(value) {
                Ok(key) => key,
                Err(_) => panic!("test menu key must be valid"),
            }
        }

        async fn wired_service() -> RiskService {
            let access = Arc::new(InMemoryAccessRepository::new());

            for key in [MenuKey::RISK_REGISTER, MenuKey::RISK_APPROVAL] {
                let registered = access.register_menu(MenuDefinition::new(menu(key))).await;
                assert!(registered.is_ok());
            }

            let officer = Role::new(RoleId::new(), "Risk Officer", "RISK_OFFICER").with_grant(
                menu(MenuKey::RISK_REGISTER),
                PermissionMask::from(Permission::Create)
                    | PermissionMask::from(Permission::Read)
                    | PermissionMask::from(Permission::Update),
            );
            let approver = Role::new(RoleId::new(), "GRC Approver", "APPROVAL_GRC").with_grant(
                menu(MenuKey::RISK_APPROVAL),
                PermissionMask::from(Permission::Read)
                    | PermissionMask::from(Permission::Approve),
            );
            let officer_id = officer.id;
            let approver_id = approver.id;
            access.upsert_role(officer).await;
            access.upsert_role(approver).await;
            assert!(access.assign_role(UserId::new(5), officer_id).await.is_ok());
            assert!(access.assign_role(UserId::new(8), approver_id).await.is_ok());

            let config = AccessConfig::default();
            let policy = SuperadminPolicy::new(config.clone());
            let permissions = PermissionService::new(config, policy.clone(), access.clone());
            let workflow = ApprovalWorkflow::new(policy, permissions.clone(), access);
            let clock = Arc::new(SystemClock::new());
            let numbering =
                RiskNumberService::new(Arc::new(InMemorySequenceAllocator::new()), clock.clone());
            let stamper = ProvenanceStamper::new(clock);

            RiskService::new(
                permissions,
                workflow,
                numbering,
                stamper,
                Arc::new(InMemoryRiskRepository::new()),
                Arc::new(InMemoryAuditRepository::new()),
            )
        }

        #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
        async fn concurrent_approvals_receive_distinct_codes() {
            let service = wired_service().await;
            let officer = UserIdentity::new(UserId::new(5), "Sari", None, Some(org("FIN")));
            let approver = UserIdentity::new(UserId::new(8), "Dewi", None, None);

            let mut ids = Vec::new();
            for index in 0..8 {
                let created = service
                    .create_risk(&officer, &format!("Risk {index}"), org("FIN"))
                    .await;
                let created = match created {
                    Ok(risk) => risk,
                    Err(_) => panic!("creation must succeed"),
                };
                assert!(service.submit_risk(&officer, created.id).await.is_ok());
                ids.push(created.id);
            }

            let mut handles = Vec::new();
            for id in ids {
                let service = service.clone();
                let approver = approver.clone();
                handles.push(tokio::spawn(async move {
                    service.approve_risk(&approver, id).await
                }));
            }

            let mut codes = BTreeSet::new();
            for handle in handles {
                let risk = match handle.await {
                    Ok(Ok(risk)) => risk,
                    _ => panic!("approval task must succeed"),
                };
                match risk.code {
                    Some(code) => codes.insert(code),
                    None => panic!("approved risk must carry a code"),
                };
            }

            assert_eq!(codes.len(), 8);
        }
    }
}
