mod workflow_tests;
