mod test_membership_ordering;
