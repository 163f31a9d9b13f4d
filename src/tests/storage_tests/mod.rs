// Storage Tests Module - Testing the domain model
// Tests organized by entity:
// - group_tests: Group membership bookkeeping, role derivation, draft defaults
// - chat_tests: Chat preview bookkeeping and unread counters
// - message_tests: Message ownership rules and previews
// - settings_tests: Settings defaults and persistence
// - catalogue_tests: Seed catalogue loading and normalization

mod message_tests;
