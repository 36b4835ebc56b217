//! `Record` and `Patch` implementations for the shared model types.
use super::{Patch, Record};
use chrono::{DateTime, Utc};
use glmock_model::{
    IndexSet, IndexSetUpdateParams, Input, InputUpdateParams, Role, RoleUpdateParams, User,
    UserUpdateParams,
};

impl Record for Role {
    const KIND: &'static str = "role";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn unique_key(&self) -> Option<&str> {
        Some(&self.name)
    }

    fn stamp_created(&mut self, at: DateTime<Utc>) {
        self.created_at = Some(at);
    }
}

impl Record for User {
    const KIND: &'static str = "user";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn unique_key(&self) -> Option<&str> {
        Some(&self.username)
    }

    fn stamp_created(&mut self, at: DateTime<Utc>) {
        self.created_at = Some(at);
    }
}

impl Record for Input {
    const KIND: &'static str = "input";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn stamp_created(&mut self, at: DateTime<Utc>) {
        self.created_at = Some(at);
    }
}

impl Record for IndexSet {
    const KIND: &'static str = "index set";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn unique_key(&self) -> Option<&str> {
        Some(&self.index_prefix)
    }

    fn stamp_created(&mut self, at: DateTime<Utc>) {
        self.created_at = Some(at);
    }
}

impl Patch<Role> for RoleUpdateParams {
    fn apply(self, role: &mut Role) {
        role.name = self.name;
        role.permissions = self.permissions;
        if let Some(description) = self.description {
            role.description = Some(description);
        }
    }
}

impl Patch<User> for UserUpdateParams {
    fn apply(self, user: &mut User) {
        if let Some(email) = self.email {
            user.email = email;
        }
        if let Some(full_name) = self.full_name {
            user.full_name = full_name;
        }
        if let Some(password) = self.password {
            user.password = Some(password);
        }
        if let Some(permissions) = self.permissions {
            user.permissions = permissions;
        }
        if let Some(roles) = self.roles {
            user.roles = roles;
        }
        if let Some(timezone) = self.timezone {
            user.timezone = Some(timezone);
        }
        if let Some(timeout) = self.session_timeout_ms {
            user.session_timeout_ms = Some(timeout);
        }
        if let Some(enabled) = self.enabled {
            user.enabled = enabled;
        }
    }
}

impl Patch<Input> for InputUpdateParams {
    fn apply(self, input: &mut Input) {
        input.title = self.title;
        input.kind = self.kind;
        input.attributes = self.attributes;
        if let Some(global) = self.global {
            input.global = global;
        }
        if let Some(node) = self.node {
            input.node = Some(node);
        }
        if let Some(index_set_id) = self.index_set_id {
            input.index_set_id = Some(index_set_id);
        }
    }
}

impl Patch<IndexSet> for IndexSetUpdateParams {
    fn apply(self, set: &mut IndexSet) {
        if let Some(title) = self.title {
            set.title = title;
        }
        if let Some(description) = self.description {
            set.description = Some(description);
        }
        if let Some(shards) = self.shards {
            set.shards = shards;
        }
        if let Some(replicas) = self.replicas {
            set.replicas = replicas;
        }
        if let Some(class) = self.rotation_strategy_class {
            set.rotation_strategy_class = class;
        }
        if let Some(strategy) = self.rotation_strategy {
            set.rotation_strategy = strategy;
        }
        if let Some(class) = self.retention_strategy_class {
            set.retention_strategy_class = class;
        }
        if let Some(strategy) = self.retention_strategy {
            set.retention_strategy = strategy;
        }
        if let Some(analyzer) = self.index_analyzer {
            set.index_analyzer = analyzer;
        }
        if let Some(segments) = self.index_optimization_max_num_segments {
            set.index_optimization_max_num_segments = segments;
        }
        if let Some(disabled) = self.index_optimization_disabled {
            set.index_optimization_disabled = disabled;
        }
        if let Some(writable) = self.writable {
            set.writable = writable;
        }
    }
}
